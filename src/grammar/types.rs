//! Name resolution against the collected declaration tables
//!
//! [`Resolver`] is the read-only view the content-model expander and the
//! attribute resolver share. It owns no state: the tables and the registry
//! are frozen once collection is over.

use crate::limits::Limits;
use crate::names::{is_builtin_type, split_qname};
use crate::namespaces::{NamespaceRegistry, QName};

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::globals::{Declaration, DeclarationMap, DeclarationTables};

/// Read-only resolution context over frozen tables
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'t, 'a> {
    pub(crate) tables: &'t DeclarationTables<'a>,
    pub(crate) registry: &'t NamespaceRegistry,
    pub(crate) limits: &'t Limits,
}

impl<'t, 'a> Resolver<'t, 'a> {
    /// Create a resolver
    pub fn new(
        tables: &'t DeclarationTables<'a>,
        registry: &'t NamespaceRegistry,
        limits: &'t Limits,
    ) -> Self {
        Self {
            tables,
            registry,
            limits,
        }
    }

    /// The namespace registry in use
    pub fn registry(&self) -> &'t NamespaceRegistry {
        self.registry
    }

    /// Resolve a complex type by name
    ///
    /// Built-in `xs:`/`xsd:` types and names of simple types resolve to
    /// `None` quietly. An unknown prefix or a name found in neither table is
    /// reported to `diagnostics`.
    pub fn resolve_type(
        &self,
        type_name: &str,
        context_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<&'t Declaration<'a>> {
        let type_name = type_name.trim();
        if type_name.is_empty() || is_builtin_type(type_name) {
            return None;
        }

        let (prefix, local) = split_qname(type_name);
        let namespace = match prefix {
            Some(prefix) => match self.registry.namespace_of_prefix(prefix) {
                Some(namespace) => namespace,
                None => {
                    diagnostics.warn(
                        DiagnosticKind::UnknownPrefix,
                        format!(
                            "Unknown prefix '{}' in type reference '{}'",
                            prefix, type_name
                        ),
                    );
                    return None;
                }
            },
            None => context_namespace,
        };

        let key = QName::new(namespace, local);
        if let Some(declaration) = self.tables.complex_types.get(&key) {
            return Some(declaration);
        }
        if self.tables.simple_types.contains_key(&key) {
            return None;
        }

        diagnostics.warn(
            DiagnosticKind::UnresolvedType,
            format!(
                "Could not resolve complex type '{}' in namespace '{}'",
                type_name, namespace
            ),
        );
        None
    }

    /// Resolve a model group reference; failures are silent
    pub fn resolve_group(&self, reference: &str, context_namespace: &str) -> Option<&'t Declaration<'a>> {
        self.resolve_in(&self.tables.groups, reference, context_namespace)
    }

    /// Resolve an attribute group reference; failures are silent
    pub fn resolve_attribute_group(
        &self,
        reference: &str,
        context_namespace: &str,
    ) -> Option<&'t Declaration<'a>> {
        self.resolve_in(&self.tables.attribute_groups, reference, context_namespace)
    }

    fn resolve_in(
        &self,
        table: &'t DeclarationMap<'a>,
        reference: &str,
        context_namespace: &str,
    ) -> Option<&'t Declaration<'a>> {
        let (prefix, local) = split_qname(reference);
        let namespace = match prefix {
            Some(prefix) => self.registry.namespace_of_prefix(prefix)?,
            None => context_namespace,
        };

        let found = table.get(&QName::new(namespace, local));
        if found.is_none() {
            log::debug!("unresolved reference '{}' in namespace '{}'", reference, namespace);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Node;

    struct Fixture {
        ct: Node,
        st: Node,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ct: Node::new("xsd:complexType").with_attr("name", "CT_Thing"),
                st: Node::new("xsd:simpleType").with_attr("name", "ST_Thing"),
            }
        }

        fn tables(&self) -> DeclarationTables<'_> {
            let mut tables = DeclarationTables::default();
            tables.complex_types.insert(
                QName::new("urn:a", "CT_Thing"),
                Declaration {
                    namespace: "urn:a",
                    node: &self.ct,
                },
            );
            tables.simple_types.insert(
                QName::new("urn:a", "ST_Thing"),
                Declaration {
                    namespace: "urn:a",
                    node: &self.st,
                },
            );
            tables
        }
    }

    fn registry() -> NamespaceRegistry {
        NamespaceRegistry::with_seeds([("urn:a", "a"), ("urn:b", "b")])
    }

    #[test]
    fn test_builtin_types_are_silent() {
        let fixture = Fixture::new();
        let tables = fixture.tables();
        let registry = registry();
        let limits = Limits::default();
        let resolver = Resolver::new(&tables, &registry, &limits);
        let mut diagnostics = Diagnostics::new();

        assert!(resolver.resolve_type("xs:string", "urn:a", &mut diagnostics).is_none());
        assert!(resolver.resolve_type("xsd:int", "urn:a", &mut diagnostics).is_none());
        assert!(resolver.resolve_type("", "urn:a", &mut diagnostics).is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_prefix_reported() {
        let fixture = Fixture::new();
        let tables = fixture.tables();
        let registry = registry();
        let limits = Limits::default();
        let resolver = Resolver::new(&tables, &registry, &limits);
        let mut diagnostics = Diagnostics::new();

        assert!(resolver.resolve_type("z:Thing", "urn:a", &mut diagnostics).is_none());
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Unknown prefix 'z'"));
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnknownPrefix).count(), 1);
    }

    #[test]
    fn test_resolves_prefixed_and_unprefixed() {
        let fixture = Fixture::new();
        let tables = fixture.tables();
        let registry = registry();
        let limits = Limits::default();
        let resolver = Resolver::new(&tables, &registry, &limits);
        let mut diagnostics = Diagnostics::new();

        let found = resolver.resolve_type("a:CT_Thing", "urn:b", &mut diagnostics);
        assert_eq!(found.map(|d| d.namespace), Some("urn:a"));
        let found = resolver.resolve_type("CT_Thing", "urn:a", &mut diagnostics);
        assert!(found.is_some());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_simple_type_is_silent() {
        let fixture = Fixture::new();
        let tables = fixture.tables();
        let registry = registry();
        let limits = Limits::default();
        let resolver = Resolver::new(&tables, &registry, &limits);
        let mut diagnostics = Diagnostics::new();

        assert!(resolver.resolve_type("ST_Thing", "urn:a", &mut diagnostics).is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_type_reported_with_namespace() {
        let fixture = Fixture::new();
        let tables = fixture.tables();
        let registry = registry();
        let limits = Limits::default();
        let resolver = Resolver::new(&tables, &registry, &limits);
        let mut diagnostics = Diagnostics::new();

        assert!(resolver.resolve_type("b:CT_Missing", "urn:a", &mut diagnostics).is_none());
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnresolvedType);
        assert!(diagnostic.message.contains("Could not resolve complex type"));
        assert!(diagnostic.message.contains("urn:b"));
    }
}
