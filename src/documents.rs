//! Parsed schema documents
//!
//! A schema document is kept as a plain tree of [`Node`]s: raw tag name,
//! attributes in source order and children in source order. Repeated and
//! single children look the same (a `Vec`), so the derivation passes never
//! special-case cardinality. Both `xs:` and `xsd:` spellings of the schema
//! vocabulary are accepted because lookups go by local name.

use crate::error::{Error, ParseError, Result};
use crate::names::split_qname;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One element of a parsed schema document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Tag name as written, including its prefix (`xsd:element`)
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with the given tag name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child node
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name without its prefix
    pub fn local_name(&self) -> &str {
        split_qname(&self.name).1
    }

    /// Whether this node's local tag name is `local`
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Get an attribute value by name (first occurrence wins)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child nodes whose local tag name is `local`
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.is(local))
    }

    /// First child node whose local tag name is `local`
    pub fn first_child_named(&self, local: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.is(local))
    }
}

/// A parsed XSD document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    /// The `schema` root element
    pub root: Node,
    /// Where the document was read from, for messages
    pub location: Option<String>,
}

impl SchemaDocument {
    /// Wrap an already-built tree; the root must be a `schema` element
    pub fn new(root: Node) -> Result<Self> {
        if !root.is("schema") {
            return Err(ParseError::new("Expected a schema root element")
                .at(root.name.as_str())
                .into());
        }
        Ok(Self {
            root,
            location: None,
        })
    }

    /// Parse a schema document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse a schema document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut root: Option<Node> = None;
        let mut stack: Vec<Node> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(Self::parse_node(&e)?);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(current),
                            None => root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let node = Self::parse_node(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Text, comments and processing instructions carry no grammar
            }
            buf.clear();
        }

        let root = root.ok_or_else(|| Error::Parse(ParseError::new("Empty schema document")))?;
        Self::new(root)
    }

    fn parse_node(start: &BytesStart) -> Result<Node> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut node = Node::new(name);
        for attr_result in start.attributes() {
            let attr =
                attr_result.map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            node.attributes.push((key, value));
        }

        Ok(node)
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The document's `targetNamespace`, empty when absent
    pub fn target_namespace(&self) -> &str {
        self.root.attr("targetNamespace").unwrap_or("")
    }

    /// `xmlns:prefix` bindings declared on the root, prefix to URI
    pub fn bindings(&self) -> IndexMap<&str, &str> {
        self.root
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix("xmlns:")
                    .map(|prefix| (prefix, value.as_str()))
            })
            .collect()
    }

    /// The prefix this document binds to `uri`, if any
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.root.attributes.iter().find_map(|(key, value)| {
            if value == uri {
                key.strip_prefix("xmlns:")
            } else {
                None
            }
        })
    }

    /// Namespaces named by top-level `import` statements
    pub fn imports(&self) -> Vec<&str> {
        self.root
            .children_named("import")
            .filter_map(|import| import.attr("namespace"))
            .collect()
    }
}
