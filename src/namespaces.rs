//! XML namespace handling
//!
//! This module provides the namespace-qualified key used by every
//! declaration table ([`QName`]) and the [`NamespaceRegistry`], the
//! bidirectional URI/prefix map that decides how names are displayed in the
//! derived grammar.

use indexmap::IndexMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// WordprocessingML main namespace
pub const WML_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Well-known OOXML namespaces and the prefixes they are conventionally given
pub const OOXML_NAMESPACES: &[(&str, &str)] = &[
    (WML_NAMESPACE, "w"),
    ("http://schemas.openxmlformats.org/officeDocument/2006/relationships", "r"),
    ("http://schemas.openxmlformats.org/officeDocument/2006/math", "m"),
    ("http://schemas.openxmlformats.org/officeDocument/2006/sharedTypes", "s"),
    ("http://schemas.openxmlformats.org/drawingml/2006/main", "a"),
    ("http://schemas.openxmlformats.org/drawingml/2006/picture", "pic"),
    ("http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing", "wp"),
    ("http://schemas.openxmlformats.org/drawingml/2006/chart", "c"),
    ("http://schemas.openxmlformats.org/drawingml/2006/diagram", "dgm"),
    ("urn:schemas-microsoft-com:vml", "v"),
    ("urn:schemas-microsoft-com:office:office", "o"),
    ("urn:schemas-microsoft-com:office:word", "w10"),
    ("http://schemas.openxmlformats.org/markup-compatibility/2006", "mc"),
    ("http://schemas.microsoft.com/office/word/2010/wordml", "w14"),
    ("http://schemas.microsoft.com/office/word/2012/wordml", "w15"),
    ("http://schemas.microsoft.com/office/word/2010/wordprocessingShape", "wps"),
    ("http://www.w3.org/XML/1998/namespace", "xml"),
];

/// Qualified name (QName) - combination of namespace and local name
///
/// This is the key type of all declaration tables. Two names are equal only
/// when both the namespace URI and the local name match; an empty namespace
/// stands for "no namespace".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI
    pub namespace: NamespaceUri,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName with a namespace
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}

/// Bidirectional map between namespace URIs and short prefixes
///
/// URIs are unique keys and no two URIs share a prefix. Entries keep their
/// insertion order, which is also the order of the serialized namespace
/// table, so a stable document order gives a stable prefix allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    prefixes: IndexMap<NamespaceUri, Prefix>,
    next_synthetic: usize,
}

impl NamespaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the given `(uri, prefix)` pairs
    ///
    /// A pair whose URI or prefix is already present is skipped.
    pub fn with_seeds<I, U, P>(seeds: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        let mut registry = Self::new();
        for (uri, prefix) in seeds {
            let (uri, prefix) = (uri.into(), prefix.into());
            if !registry.prefixes.contains_key(&uri) && !registry.is_prefix_taken(&prefix) {
                registry.prefixes.insert(uri, prefix);
            }
        }
        registry
    }

    /// Create a registry seeded with the well-known OOXML prefixes
    pub fn ooxml() -> Self {
        Self::with_seeds(OOXML_NAMESPACES.iter().copied())
    }

    /// Return the prefix of `uri`, allocating a synthetic one if it is new
    pub fn register_namespace(&mut self, uri: &str) -> Prefix {
        self.register_namespace_with_hint(uri, None)
    }

    /// Like [`register_namespace`](Self::register_namespace), but tries
    /// `hint` before falling back to a synthetic `gN` prefix
    pub fn register_namespace_with_hint(&mut self, uri: &str, hint: Option<&str>) -> Prefix {
        if let Some(existing) = self.prefixes.get(uri) {
            return existing.clone();
        }

        let prefix = match hint {
            Some(hint) if !hint.is_empty() && !self.is_prefix_taken(hint) => hint.to_string(),
            _ => self.allocate_synthetic(),
        };

        log::debug!("registered namespace '{}' as '{}'", uri, prefix);
        self.prefixes.insert(uri.to_string(), prefix.clone());
        prefix
    }

    fn allocate_synthetic(&mut self) -> Prefix {
        loop {
            let candidate = format!("g{}", self.next_synthetic);
            self.next_synthetic += 1;
            if !self.is_prefix_taken(&candidate) {
                return candidate;
            }
        }
    }

    fn is_prefix_taken(&self, prefix: &str) -> bool {
        self.prefixes.values().any(|p| p == prefix)
    }

    /// Get the prefix registered for a namespace URI
    pub fn prefix_of(&self, uri: &str) -> Option<&str> {
        self.prefixes.get(uri).map(|s| s.as_str())
    }

    /// Reverse lookup: the namespace URI registered under `prefix`
    pub fn namespace_of_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, p)| p.as_str() == prefix)
            .map(|(uri, _)| uri.as_str())
    }

    /// Render a QName as `prefix:local` if its namespace is registered
    pub fn display(&self, qname: &QName) -> Option<String> {
        self.prefix_of(&qname.namespace)
            .map(|prefix| crate::names::join_qname(prefix, &qname.local_name))
    }

    /// Number of registered namespaces
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether no namespace is registered
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterate `(uri, prefix)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Copy of the URI to prefix table
    pub fn snapshot(&self) -> IndexMap<NamespaceUri, Prefix> {
        self.prefixes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_qname_display() {
        let qname = QName::new("urn:a", "Alpha");
        assert_eq!(qname.to_string(), "{urn:a}Alpha");
        assert_eq!(QName::new("", "local").to_string(), "local");
    }

    #[test]
    fn test_ooxml_seeds() {
        let registry = NamespaceRegistry::ooxml();
        assert_eq!(registry.prefix_of(WML_NAMESPACE), Some("w"));
        assert_eq!(registry.namespace_of_prefix("w"), Some(WML_NAMESPACE));
        assert_eq!(registry.namespace_of_prefix("nope"), None);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = NamespaceRegistry::new();
        let first = registry.register_namespace("urn:x");
        let second = registry.register_namespace("urn:x");
        assert_eq!(first, "g0");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_synthetic_prefix_skips_taken() {
        let mut registry = NamespaceRegistry::with_seeds([("urn:seed", "g0")]);
        assert_eq!(registry.register_namespace("urn:x"), "g1");
        assert_eq!(registry.register_namespace("urn:y"), "g2");
    }

    #[test]
    fn test_hint_used_when_free() {
        let mut registry = NamespaceRegistry::with_seeds([("urn:a", "a")]);
        assert_eq!(registry.register_namespace_with_hint("urn:b", Some("b")), "b");
        assert_eq!(registry.register_namespace_with_hint("urn:c", Some("a")), "g0");
    }

    #[test]
    fn test_display() {
        let registry = NamespaceRegistry::ooxml();
        assert_eq!(
            registry.display(&QName::new(WML_NAMESPACE, "p")),
            Some("w:p".to_string())
        );
        assert_eq!(registry.display(&QName::new("urn:nowhere", "p")), None);
    }

    proptest! {
        #[test]
        fn prop_prefixes_are_unique(uris in proptest::collection::vec("urn:[a-z]{1,6}", 0..40)) {
            let mut registry = NamespaceRegistry::ooxml();
            for uri in &uris {
                let prefix = registry.register_namespace(uri);
                prop_assert_eq!(registry.namespace_of_prefix(&prefix), Some(uri.as_str()));
            }
            let mut prefixes: Vec<&str> = registry.iter().map(|(_, p)| p).collect();
            let total = prefixes.len();
            prefixes.sort();
            prefixes.dedup();
            prop_assert_eq!(prefixes.len(), total);
        }
    }
}
