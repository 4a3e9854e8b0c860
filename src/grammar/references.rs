//! Element reference resolution
//!
//! Drains the [`PendingElementRef`] queue built by the collector. Each
//! reference is resolved to a concrete namespace and local name; references
//! to elements that were never declared get a placeholder entry so later
//! passes always find something to look up.

use crate::names::{join_qname, split_qname};
use crate::namespaces::{NamespaceRegistry, QName};

use super::globals::{insert_element, ElementEntry, ElementSource, ElementTable, PendingElementRef};

/// Placeholder complex type name for an element known only by reference
pub fn placeholder_type_name(prefix: &str, local: &str) -> String {
    join_qname(prefix, &format!("{}Type", local))
}

/// Resolve one reference to its qualified name and display prefix
///
/// Prefixed references resolve through the registry; unprefixed ones live in
/// the namespace that declared the reference. Returns `None` for an unknown
/// prefix.
pub fn resolve_reference(
    pending: &PendingElementRef,
    registry: &NamespaceRegistry,
) -> Option<(QName, String)> {
    match split_qname(&pending.ref_name) {
        (Some(prefix), local) => {
            let namespace = registry.namespace_of_prefix(prefix)?;
            Some((QName::new(namespace, local), prefix.to_string()))
        }
        (None, local) => Some((
            QName::new(pending.declaring_namespace.as_str(), local),
            pending.declaring_prefix.clone(),
        )),
    }
}

/// Resolve every pending reference, consuming the queue
///
/// Returns the number of placeholder entries created.
pub fn resolve_references<'a>(
    pending: Vec<PendingElementRef>,
    elements: &mut ElementTable<'a>,
    registry: &NamespaceRegistry,
) -> usize {
    let mut created = 0;

    for reference in pending {
        let Some((name, prefix)) = resolve_reference(&reference, registry) else {
            log::debug!(
                "dropping element reference '{}': unknown prefix",
                reference.ref_name
            );
            continue;
        };

        if elements.contains_key(&name) {
            continue;
        }

        let type_name = placeholder_type_name(&prefix, &name.local_name);
        if insert_element(
            elements,
            ElementEntry::new(name, prefix, ElementSource::Referenced { type_name }),
        ) {
            created += 1;
        }
    }

    created
}
