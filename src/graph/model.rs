//! Serializable model of the derived grammar
//!
//! These structures are the persisted form of a build: one JSON document
//! with the namespace table and, for every element, its allowed children and
//! attributes. Loading it back gives the same [`SchemaGraph`] without
//! re-reading any XSD.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key under which an `anyAttribute` wildcard is recorded
pub const WILDCARD_ATTRIBUTE: &str = "*";

/// Type name recorded for attributes declared by `ref`
pub const REFERENCED_ATTRIBUTE_TYPE: &str = "referenced";

/// Attribute map of one element, keyed by `prefix:local`
pub type AttributeMap = BTreeMap<String, AttributeSpec>;

/// The derived grammar
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaGraph {
    /// Namespace URI to prefix, in registration order
    pub namespaces: IndexMap<String, String>,

    /// Element grammar keyed by `prefix:local`, sorted
    pub elements: BTreeMap<String, ElementSchemaEntry>,
}

impl SchemaGraph {
    /// Create a graph from its parts
    pub fn new(
        namespaces: IndexMap<String, String>,
        elements: BTreeMap<String, ElementSchemaEntry>,
    ) -> Self {
        Self {
            namespaces,
            elements,
        }
    }
}

/// Grammar of a single element
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementSchemaEntry {
    /// Allowed child elements, deduplicated and sorted
    pub children: Vec<String>,

    /// Legal attributes
    pub attributes: AttributeMap,

    /// Members of `children` that only the pass-through whitelist allows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pass_through: Vec<String>,
}

impl ElementSchemaEntry {
    /// Whether the content model itself declares `child`
    pub fn declares(&self, child: &str) -> bool {
        self.children.iter().any(|c| c == child) && !self.pass_through.iter().any(|c| c == child)
    }
}

/// How an attribute may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeUse {
    /// Attribute may be omitted (default)
    #[default]
    Optional,
    /// Attribute must be present
    Required,
    /// Attribute may be omitted and then takes its declared default
    Default,
}

impl AttributeUse {
    /// Get the use as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeUse::Optional => "optional",
            AttributeUse::Required => "required",
            AttributeUse::Default => "default",
        }
    }
}

impl fmt::Display for AttributeUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared or referenced attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDecl {
    /// Simple type name, or `referenced` for `ref=` attributes
    #[serde(rename = "type")]
    pub type_name: String,

    /// Use mode
    #[serde(rename = "use")]
    pub use_mode: AttributeUse,

    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Fixed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<String>,

    /// The `ref` an attribute was declared through
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Entry of an element's attribute map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    /// `anyAttribute` sentinel, serialized as `{"wildcard": true}`
    Wildcard {
        /// Always true
        wildcard: bool,
    },
    /// A concrete attribute
    Declared(AttributeDecl),
}

impl AttributeSpec {
    /// The wildcard sentinel
    pub fn wildcard() -> Self {
        AttributeSpec::Wildcard { wildcard: true }
    }

    /// Whether this is the wildcard sentinel
    pub fn is_wildcard(&self) -> bool {
        matches!(self, AttributeSpec::Wildcard { .. })
    }

    /// The declaration, unless this is the wildcard
    pub fn as_declared(&self) -> Option<&AttributeDecl> {
        match self {
            AttributeSpec::Declared(decl) => Some(decl),
            AttributeSpec::Wildcard { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_json_shape() {
        let mut attributes = AttributeMap::new();
        attributes.insert(
            "w:val".to_string(),
            AttributeSpec::Declared(AttributeDecl {
                type_name: "ST_OnOff".to_string(),
                use_mode: AttributeUse::Required,
                default: None,
                fixed: None,
                reference: None,
            }),
        );
        attributes.insert(WILDCARD_ATTRIBUTE.to_string(), AttributeSpec::wildcard());

        let mut elements = BTreeMap::new();
        elements.insert(
            "w:b".to_string(),
            ElementSchemaEntry {
                children: vec![],
                attributes,
                ..Default::default()
            },
        );
        let mut namespaces = IndexMap::new();
        namespaces.insert("urn:w".to_string(), "w".to_string());

        let graph = SchemaGraph::new(namespaces, elements);
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["namespaces"]["urn:w"], "w");
        assert_eq!(json["elements"]["w:b"]["attributes"]["w:val"]["use"], "required");
        assert_eq!(json["elements"]["w:b"]["attributes"]["w:val"]["type"], "ST_OnOff");
        assert!(json["elements"]["w:b"]["attributes"]["w:val"].get("default").is_none());
        assert_eq!(json["elements"]["w:b"]["attributes"]["*"]["wildcard"], true);
        assert!(json["elements"]["w:b"].get("pass_through").is_none());
    }

    #[test]
    fn test_declares_ignores_pass_through() {
        let entry = ElementSchemaEntry {
            children: vec!["w:ins".to_string(), "w:p".to_string()],
            pass_through: vec!["w:ins".to_string()],
            ..Default::default()
        };
        assert!(entry.declares("w:p"));
        assert!(!entry.declares("w:ins"));
        assert!(!entry.declares("w:tbl"));

        let loaded: ElementSchemaEntry =
            serde_json::from_str(r#"{"children": ["w:p"], "attributes": {}}"#).unwrap();
        assert!(loaded.pass_through.is_empty());
        assert!(loaded.declares("w:p"));
    }

    #[test]
    fn test_attribute_spec_deserialization() {
        let wildcard: AttributeSpec = serde_json::from_str(r#"{"wildcard": true}"#).unwrap();
        assert!(wildcard.is_wildcard());

        let declared: AttributeSpec =
            serde_json::from_str(r#"{"type": "referenced", "use": "optional", "ref": "xml:space"}"#)
                .unwrap();
        let decl = declared.as_declared().unwrap();
        assert_eq!(decl.type_name, REFERENCED_ATTRIBUTE_TYPE);
        assert_eq!(decl.reference.as_deref(), Some("xml:space"));
    }

    #[test]
    fn test_attribute_use_display() {
        assert_eq!(AttributeUse::Default.to_string(), "default");
        assert_eq!(AttributeUse::default(), AttributeUse::Optional);
    }
}
