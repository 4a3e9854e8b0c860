//! Synthetic element inference
//!
//! OOXML schemas often define a complex type such as `CT_Body` without a
//! top-level element that uses it. This heuristic infers such elements from
//! the type name (`CT_Body` backs `body`). It is a best-effort rule kept
//! apart from the core resolution so it can be tuned or switched off through
//! [`SyntheticElementRule`].

use crate::names::{is_valid_ncname, lowercase_first};
use crate::namespaces::{NamespaceRegistry, QName};

use super::globals::{insert_element, DeclarationTables, ElementEntry, ElementSource, ElementTable};

/// Thresholds for inferring an element from a complex type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticElementRule {
    /// Prefix a complex type name must carry, e.g. `CT_`
    pub type_prefix: String,
    /// Longest identifier after the prefix that still yields an element
    pub max_name_len: usize,
    /// Only identifiers starting with an uppercase letter qualify
    pub require_uppercase_start: bool,
}

impl Default for SyntheticElementRule {
    fn default() -> Self {
        Self {
            type_prefix: "CT_".to_string(),
            max_name_len: 10,
            require_uppercase_start: true,
        }
    }
}

impl SyntheticElementRule {
    /// Element local name implied by a complex type name, if any
    pub fn element_name_for(&self, type_name: &str) -> Option<String> {
        let ident = type_name.strip_prefix(self.type_prefix.as_str())?;
        if ident.is_empty() || ident.chars().count() > self.max_name_len {
            return None;
        }

        let first = ident.chars().next()?;
        if self.require_uppercase_start && !first.is_uppercase() {
            return None;
        }

        let name = lowercase_first(ident);
        is_valid_ncname(&name).then_some(name)
    }
}

/// Add an element for every complex type matching `rule` whose implied
/// element is not yet known in the type's namespace
///
/// Returns the number of elements created. Existing entries are never
/// replaced.
pub fn infer_synthetic_elements<'a>(
    rule: &SyntheticElementRule,
    tables: &DeclarationTables<'a>,
    elements: &mut ElementTable<'a>,
    registry: &NamespaceRegistry,
) -> usize {
    let mut created = 0;

    for type_name in tables.complex_types.keys() {
        let Some(local) = rule.element_name_for(&type_name.local_name) else {
            continue;
        };
        let Some(prefix) = registry.prefix_of(&type_name.namespace) else {
            log::debug!("no prefix for namespace of {}, skipping", type_name);
            continue;
        };

        let name = QName::new(type_name.namespace.as_str(), local);
        if elements.contains_key(&name) {
            continue;
        }

        let source = ElementSource::Synthetic {
            type_name: type_name.local_name.clone(),
        };
        if insert_element(elements, ElementEntry::new(name, prefix, source)) {
            created += 1;
        }
    }

    log::debug!("inferred {} synthetic elements", created);
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Node;
    use crate::grammar::globals::Declaration;

    #[test]
    fn test_element_name_for() {
        let rule = SyntheticElementRule::default();
        assert_eq!(rule.element_name_for("CT_Body"), Some("body".to_string()));
        assert_eq!(rule.element_name_for("CT_PPr"), Some("pPr".to_string()));
        assert_eq!(rule.element_name_for("CT_TblGridChange"), None); // 13 chars
        assert_eq!(rule.element_name_for("CT_lower"), None);
        assert_eq!(rule.element_name_for("CT_"), None);
        assert_eq!(rule.element_name_for("ST_Body"), None);
    }

    #[test]
    fn test_thresholds_configurable() {
        let rule = SyntheticElementRule {
            max_name_len: 20,
            ..Default::default()
        };
        assert_eq!(
            rule.element_name_for("CT_TblGridChange"),
            Some("tblGridChange".to_string())
        );
    }

    #[test]
    fn test_infer_never_overrides() {
        let ct_body = Node::new("xsd:complexType").with_attr("name", "CT_Body");
        let ct_tbl = Node::new("xsd:complexType").with_attr("name", "CT_Tbl");
        let declared = Node::new("xsd:element").with_attr("name", "tbl").with_attr("type", "CT_Other");

        let mut tables = DeclarationTables::default();
        for node in [&ct_body, &ct_tbl] {
            tables.complex_types.insert(
                QName::new("urn:w", node.attr("name").unwrap()),
                Declaration {
                    namespace: "urn:w",
                    node,
                },
            );
        }

        let mut elements = ElementTable::new();
        insert_element(
            &mut elements,
            ElementEntry::new(QName::new("urn:w", "tbl"), "w", ElementSource::Declared(&declared)),
        );

        let registry = NamespaceRegistry::with_seeds([("urn:w", "w")]);
        let created = infer_synthetic_elements(
            &SyntheticElementRule::default(),
            &tables,
            &mut elements,
            &registry,
        );

        assert_eq!(created, 1);
        assert_eq!(
            elements[&QName::new("urn:w", "body")].type_name(),
            Some("CT_Body")
        );
        assert_eq!(
            elements[&QName::new("urn:w", "tbl")].type_name(),
            Some("CT_Other")
        );
    }
}
