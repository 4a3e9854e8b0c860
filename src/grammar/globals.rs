//! Global declaration tables and the declaration collector
//!
//! The collector makes a single pass over every schema document and indexes
//! the top-level `complexType`, `simpleType`, `group`, `attributeGroup` and
//! `element` declarations by [`QName`]. Elements declared inline inside type
//! and group bodies are discovered as well, and element references found
//! there are queued as [`PendingElementRef`]s for the reference resolver.
//!
//! Every table keeps the first declaration it sees for a key. Later
//! declarations of the same name are dropped.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::documents::{Node, SchemaDocument};
use crate::limits::Limits;
use crate::names::{join_qname, split_qname};
use crate::namespaces::{NamespaceRegistry, Prefix, QName};

/// A top-level declaration in its declaring namespace
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    /// Declaring namespace
    pub namespace: &'a str,
    /// The declaration's tree
    pub node: &'a Node,
}

/// Declarations of one kind keyed by qualified name
pub type DeclarationMap<'a> = IndexMap<QName, Declaration<'a>>;

/// The four type/group tables
#[derive(Debug, Clone, Default)]
pub struct DeclarationTables<'a> {
    /// Named complex types
    pub complex_types: DeclarationMap<'a>,
    /// Named simple types
    pub simple_types: DeclarationMap<'a>,
    /// Named model groups
    pub groups: DeclarationMap<'a>,
    /// Named attribute groups
    pub attribute_groups: DeclarationMap<'a>,
}

/// Where an element entry came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSource<'a> {
    /// An explicit `element name="..."` declaration
    Declared(&'a Node),
    /// Created while resolving an element reference with no declaration
    Referenced {
        /// Placeholder complex type name
        type_name: String,
    },
    /// Inferred from a complex type name
    Synthetic {
        /// The complex type backing the element
        type_name: String,
    },
}

/// The canonical record for one known element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEntry<'a> {
    /// Namespace and local name
    pub name: QName,
    /// Registry prefix of the namespace
    pub prefix: Prefix,
    /// Declaration or synthesis origin
    pub source: ElementSource<'a>,
}

impl<'a> ElementEntry<'a> {
    /// Create an entry
    pub fn new(name: QName, prefix: impl Into<String>, source: ElementSource<'a>) -> Self {
        Self {
            name,
            prefix: prefix.into(),
            source,
        }
    }

    /// `prefix:local`, the key used in the derived grammar
    pub fn display_name(&self) -> String {
        join_qname(&self.prefix, &self.name.local_name)
    }

    /// Name of the element's complex type, if it names one
    pub fn type_name(&self) -> Option<&str> {
        match &self.source {
            ElementSource::Declared(node) => node.attr("type"),
            ElementSource::Referenced { type_name } | ElementSource::Synthetic { type_name } => {
                Some(type_name)
            }
        }
    }

    /// Anonymous complex type declared inside the element
    pub fn inline_type(&self) -> Option<&'a Node> {
        match self.source {
            ElementSource::Declared(node) => node.first_child_named("complexType"),
            _ => None,
        }
    }
}

/// Known elements keyed by qualified name
pub type ElementTable<'a> = IndexMap<QName, ElementEntry<'a>>;

/// Insert an element unless the key is already present
///
/// Returns whether the entry was inserted.
pub fn insert_element<'a>(table: &mut ElementTable<'a>, entry: ElementEntry<'a>) -> bool {
    match table.entry(entry.name.clone()) {
        Entry::Occupied(_) => {
            log::debug!("element {} already known, keeping first declaration", entry.name);
            false
        }
        Entry::Vacant(slot) => {
            slot.insert(entry);
            true
        }
    }
}

/// An element reference waiting for resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingElementRef {
    /// The `ref` attribute as written
    pub ref_name: String,
    /// Namespace of the type or group containing the reference
    pub declaring_namespace: String,
    /// Prefix of the declaring namespace
    pub declaring_prefix: Prefix,
}

/// Output of the declaration collector
#[derive(Debug, Clone, Default)]
pub struct Collection<'a> {
    /// Type and group tables
    pub tables: DeclarationTables<'a>,
    /// Preliminary element table
    pub elements: ElementTable<'a>,
    /// References to resolve
    pub pending: Vec<PendingElementRef>,
}

/// Index all declarations of `documents`, in document order
///
/// Types, groups and inline elements of every document are collected before
/// any top-level element, so an inline declaration takes precedence over a
/// later top-level one of the same name.
pub fn collect_declarations<'a>(
    documents: &'a [SchemaDocument],
    registry: &mut NamespaceRegistry,
    limits: &Limits,
) -> Collection<'a> {
    let mut collector = DeclarationCollector {
        registry,
        limits,
        collection: Collection::default(),
    };

    for document in documents {
        collector.collect_definitions(document);
    }
    for document in documents {
        collector.collect_elements(document);
    }

    log::debug!(
        "collected {} complex types, {} simple types, {} groups, {} attribute groups, {} elements, {} pending references",
        collector.collection.tables.complex_types.len(),
        collector.collection.tables.simple_types.len(),
        collector.collection.tables.groups.len(),
        collector.collection.tables.attribute_groups.len(),
        collector.collection.elements.len(),
        collector.collection.pending.len(),
    );

    collector.collection
}

struct DeclarationCollector<'a, 'r> {
    registry: &'r mut NamespaceRegistry,
    limits: &'r Limits,
    collection: Collection<'a>,
}

impl<'a, 'r> DeclarationCollector<'a, 'r> {
    fn register_document(&mut self, document: &'a SchemaDocument) -> Prefix {
        for import in document.imports() {
            self.registry
                .register_namespace_with_hint(import, document.prefix_for(import));
        }

        let namespace = document.target_namespace();
        self.registry
            .register_namespace_with_hint(namespace, document.prefix_for(namespace))
    }

    fn collect_definitions(&mut self, document: &'a SchemaDocument) {
        let prefix = self.register_document(document);
        let namespace = document.target_namespace();

        for child in &document.root.children {
            let Some(name) = child.attr("name") else {
                continue;
            };
            let key = QName::new(namespace, name);
            let declaration = Declaration {
                namespace,
                node: child,
            };
            let tables = &mut self.collection.tables;

            match child.local_name() {
                "complexType" => {
                    tables.complex_types.entry(key).or_insert(declaration);
                    self.discover_inline(document, child, namespace, &prefix, 0);
                }
                "group" => {
                    tables.groups.entry(key).or_insert(declaration);
                    self.discover_inline(document, child, namespace, &prefix, 0);
                }
                "simpleType" => {
                    tables.simple_types.entry(key).or_insert(declaration);
                }
                "attributeGroup" => {
                    tables.attribute_groups.entry(key).or_insert(declaration);
                }
                _ => {}
            }
        }
    }

    fn collect_elements(&mut self, document: &'a SchemaDocument) {
        let namespace = document.target_namespace();
        let prefix = self.registry.register_namespace(namespace);

        for element in document.root.children_named("element") {
            let Some(name) = element.attr("name") else {
                continue;
            };
            let entry = ElementEntry::new(
                QName::new(namespace, name),
                prefix.clone(),
                ElementSource::Declared(element),
            );
            insert_element(&mut self.collection.elements, entry);

            if let Some(inline) = element.first_child_named("complexType") {
                self.discover_inline(document, inline, namespace, &prefix, 0);
            }
        }
    }

    /// Walk a type or group body for inline element declarations and
    /// references, stopping silently past the content depth bound
    ///
    /// Only compositors count towards `depth`, the same way
    /// [`Resolver::expand`](super::types::Resolver) counts them.
    fn discover_inline(
        &mut self,
        document: &'a SchemaDocument,
        body: &'a Node,
        namespace: &'a str,
        prefix: &str,
        depth: usize,
    ) {
        if !self.limits.within_content_depth(depth) {
            log::debug!("inline discovery truncated at depth {}", depth);
            return;
        }

        for child in &body.children {
            match child.local_name() {
                "element" => {
                    if let Some(name) = child.attr("name") {
                        let entry = ElementEntry::new(
                            QName::new(namespace, name),
                            prefix,
                            ElementSource::Declared(child),
                        );
                        insert_element(&mut self.collection.elements, entry);

                        // An anonymous type is expanded on its own, so its
                        // content model counts from zero again
                        if let Some(inline) = child.first_child_named("complexType") {
                            self.discover_inline(document, inline, namespace, prefix, 0);
                        }
                    } else if let Some(reference) = child.attr("ref") {
                        self.enqueue_reference(document, reference, namespace, prefix);
                    }
                }
                "sequence" | "choice" | "all" => {
                    self.discover_inline(document, child, namespace, prefix, depth + 1);
                }
                // Derivation wrappers are not compositors and add no depth
                "complexContent" | "simpleContent" | "extension" | "restriction" => {
                    self.discover_inline(document, child, namespace, prefix, depth);
                }
                _ => {}
            }
        }
    }

    fn enqueue_reference(
        &mut self,
        document: &'a SchemaDocument,
        reference: &str,
        namespace: &str,
        prefix: &str,
    ) {
        // A prefix the registry has never seen may still be bound in the
        // declaring document; register its namespace under that prefix.
        if let (Some(ref_prefix), _) = split_qname(reference) {
            if self.registry.namespace_of_prefix(ref_prefix).is_none() {
                if let Some(uri) = document.bindings().get(ref_prefix) {
                    self.registry
                        .register_namespace_with_hint(uri, Some(ref_prefix));
                }
            }
        }

        self.collection.pending.push(PendingElementRef {
            ref_name: reference.to_string(),
            declaring_namespace: namespace.to_string(),
            declaring_prefix: prefix.to_string(),
        });
    }
}
