//! Read-only queries over a derived [`SchemaGraph`]
//!
//! This is the surface the editor and the CLI consume. Every query is pure;
//! a name missing from the graph behaves like an element with no children
//! and no attributes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::names::split_qname;

use super::model::{AttributeMap, AttributeSpec, ElementSchemaEntry, SchemaGraph};

/// Containers whose children are block-level content
pub const BLOCK_CONTAINERS: &[&str] = &[
    "w:body",
    "w:tc",
    "w:txbxContent",
    "w:hdr",
    "w:ftr",
    "w:footnote",
    "w:endnote",
    "w:comment",
];

/// Containers whose children are inline (paragraph-flow) content
pub const INLINE_CONTAINERS: &[&str] = &["w:p", "w:r", "w:hyperlink"];

/// Filter for [`SchemaGraph::all_tags`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Only tags with this prefix
    pub prefix: Option<String>,
    /// Only tags that do (`true`) or do not (`false`) allow children
    pub has_children: Option<bool>,
}

impl TagFilter {
    /// Match every tag
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Restrict on whether children are allowed
    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = Some(has_children);
        self
    }

    fn matches(&self, qname: &str, entry: &ElementSchemaEntry) -> bool {
        if let Some(prefix) = &self.prefix {
            if split_qname(qname).0 != Some(prefix.as_str()) {
                return false;
            }
        }
        match self.has_children {
            Some(wanted) => wanted == !entry.children.is_empty(),
            None => true,
        }
    }
}

/// Result of [`SchemaGraph::validate_children`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildValidation {
    /// Whether every child is allowed
    pub ok: bool,
    /// Children that are not allowed, in input order
    pub invalid: Vec<String>,
}

/// Coverage figures for a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaStats {
    /// Number of elements
    pub total_elements: usize,
    /// Elements allowing at least one child
    pub elements_with_children: usize,
    /// Number of registered namespaces
    pub namespace_count: usize,
    /// Element count per prefix
    pub by_namespace: BTreeMap<String, usize>,
}

/// Whether an element is block-level or inline content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Block-level structure
    Block,
    /// Inline paragraph content
    Inline,
    /// Not enough information
    Unknown,
}

impl Classification {
    /// Get the classification as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Block => "block",
            Classification::Inline => "inline",
            Classification::Unknown => "unknown",
        }
    }

    /// Collapse `Unknown` into `Block`, the safe default for wrapping
    pub fn or_block(self) -> Self {
        match self {
            Classification::Unknown => Classification::Block,
            other => other,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SchemaGraph {
    /// Allowed children of `qname`, sorted; empty when unknown
    pub fn allowed_children(&self, qname: &str) -> &[String] {
        self.elements
            .get(qname)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `child` may appear directly inside `parent`
    pub fn is_allowed_child(&self, parent: &str, child: &str) -> bool {
        self.allowed_children(parent).iter().any(|c| c == child)
    }

    /// Check a list of children against `parent`
    pub fn validate_children<S: AsRef<str>>(&self, parent: &str, children: &[S]) -> ChildValidation {
        let invalid: Vec<String> = children
            .iter()
            .map(AsRef::as_ref)
            .filter(|child| !self.is_allowed_child(parent, child))
            .map(str::to_string)
            .collect();
        ChildValidation {
            ok: invalid.is_empty(),
            invalid,
        }
    }

    /// Whether the graph has an entry for `qname`
    pub fn has_element(&self, qname: &str) -> bool {
        self.elements.contains_key(qname)
    }

    /// Attribute map of `qname`
    pub fn attributes(&self, qname: &str) -> Option<&AttributeMap> {
        self.elements.get(qname).map(|entry| &entry.attributes)
    }

    /// One attribute of `qname`
    pub fn attribute(&self, qname: &str, attribute: &str) -> Option<&AttributeSpec> {
        self.attributes(qname)?.get(attribute)
    }

    /// Sorted element names matching `filter`
    pub fn all_tags(&self, filter: &TagFilter) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|(qname, entry)| filter.matches(qname, entry))
            .map(|(qname, _)| qname.as_str())
            .collect()
    }

    /// Namespace URI to prefix table
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Coverage statistics
    pub fn stats(&self) -> SchemaStats {
        let mut by_namespace = BTreeMap::new();
        for qname in self.elements.keys() {
            let prefix = split_qname(qname).0.unwrap_or("");
            *by_namespace.entry(prefix.to_string()).or_insert(0) += 1;
        }

        SchemaStats {
            total_elements: self.elements.len(),
            elements_with_children: self
                .elements
                .values()
                .filter(|entry| !entry.children.is_empty())
                .count(),
            namespace_count: self.namespaces.len(),
            by_namespace,
        }
    }

    /// Whether the content model of `parent` declares `child`, ignoring
    /// children injected by the pass-through whitelist
    pub fn declares_child(&self, parent: &str, child: &str) -> bool {
        self.elements
            .get(parent)
            .is_some_and(|entry| entry.declares(child))
    }

    /// Classify `qname` as block or inline content
    ///
    /// Only declared membership counts: a pass-through marker injected into
    /// every container is classified by where the schema actually puts it.
    /// Block containers are checked first, so an element declared in both
    /// positions classifies as `Block`. Consumers should wrap `Unknown` as
    /// block (see [`Classification::or_block`]).
    pub fn classify_block_or_inline(&self, qname: &str) -> Classification {
        if !self.has_element(qname) {
            return Classification::Unknown;
        }

        let listed_by = |containers: &[&str]| {
            containers
                .iter()
                .any(|container| self.declares_child(container, qname))
        };

        if listed_by(BLOCK_CONTAINERS) {
            Classification::Block
        } else if listed_by(INLINE_CONTAINERS) {
            Classification::Inline
        } else {
            Classification::Unknown
        }
    }
}
