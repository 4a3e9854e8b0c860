//! Schema assembly
//!
//! [`SchemaBuilder`] drives the whole pipeline: it collects declarations,
//! resolves element references, optionally infers synthetic elements, then
//! freezes the tables and computes the children and attributes of every
//! known element. The result is an immutable [`SchemaGraph`].

use std::collections::{BTreeMap, BTreeSet};

use crate::documents::{Node, SchemaDocument};
use crate::graph::{AttributeMap, ElementSchemaEntry, SchemaGraph};
use crate::limits::Limits;
use crate::namespaces::{NamespaceRegistry, OOXML_NAMESPACES};

use super::diagnostics::{Diagnostic, Diagnostics};
use super::globals::{collect_declarations, ElementEntry};
use super::references::resolve_references;
use super::synthetic::{infer_synthetic_elements, SyntheticElementRule};
use super::types::Resolver;

/// Markup elements structurally allowed almost everywhere
pub const PASS_THROUGH_MARKERS: &[&str] = &[
    "w:bookmarkStart",
    "w:bookmarkEnd",
    "w:ins",
    "w:del",
    "w:moveFrom",
    "w:moveTo",
    "w:sdt",
    "w:proofErr",
];

/// Containers that accept the markers even with no derived children
pub const PASS_THROUGH_CONTAINERS: &[&str] = &["w:p", "w:tc", "w:body", "w:document"];

/// The pass-through whitelist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassThrough {
    /// Marker elements to inject
    pub markers: Vec<String>,
    /// Elements that always receive the markers
    pub containers: Vec<String>,
}

impl Default for PassThrough {
    fn default() -> Self {
        Self {
            markers: PASS_THROUGH_MARKERS.iter().map(|s| s.to_string()).collect(),
            containers: PASS_THROUGH_CONTAINERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PassThrough {
    /// An empty whitelist
    pub fn none() -> Self {
        Self {
            markers: Vec::new(),
            containers: Vec::new(),
        }
    }

    /// Whether `qname` is one of the known containers
    pub fn is_container(&self, qname: &str) -> bool {
        self.containers.iter().any(|c| c == qname)
    }

    /// Inject the markers into `children` of element `qname` when it has
    /// children already or is a known container
    ///
    /// Returns the markers that were not already present, sorted.
    pub fn apply(&self, qname: &str, children: &mut BTreeSet<String>) -> Vec<String> {
        if children.is_empty() && !self.is_container(qname) {
            return Vec::new();
        }
        let injected: BTreeSet<String> = self
            .markers
            .iter()
            .filter(|marker| !children.contains(*marker))
            .cloned()
            .collect();
        children.extend(injected.iter().cloned());
        injected.into_iter().collect()
    }
}

/// Options for one build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Recursion bounds
    pub limits: Limits,
    /// Synthetic element rule, `None` to disable inference
    pub synthetic: Option<SyntheticElementRule>,
    /// Pass-through whitelist
    pub pass_through: PassThrough,
    /// `(uri, prefix)` pairs registered before any document is read
    pub seed_namespaces: Vec<(String, String)>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::ooxml()
    }
}

impl BuildOptions {
    /// OOXML defaults: standard prefixes, synthetic inference, pass-through
    pub fn ooxml() -> Self {
        Self {
            limits: Limits::default(),
            synthetic: Some(SyntheticElementRule::default()),
            pass_through: PassThrough::default(),
            seed_namespaces: OOXML_NAMESPACES
                .iter()
                .map(|(uri, prefix)| (uri.to_string(), prefix.to_string()))
                .collect(),
        }
    }

    /// No seeds, no heuristics, no pass-through
    pub fn bare() -> Self {
        Self {
            limits: Limits::default(),
            synthetic: None,
            pass_through: PassThrough::none(),
            seed_namespaces: Vec::new(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set or disable the synthetic element rule
    pub fn with_synthetic(mut self, rule: Option<SyntheticElementRule>) -> Self {
        self.synthetic = rule;
        self
    }

    /// Set the pass-through whitelist
    pub fn with_pass_through(mut self, pass_through: PassThrough) -> Self {
        self.pass_through = pass_through;
        self
    }

    /// Add a namespace seed
    pub fn with_seed(mut self, uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.seed_namespaces.push((uri.into(), prefix.into()));
        self
    }
}

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// The derived grammar
    pub graph: SchemaGraph,
    /// Warnings raised while resolving types
    pub diagnostics: Vec<Diagnostic>,
}

/// Assembles a [`SchemaGraph`] from schema documents
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    options: BuildOptions,
}

impl SchemaBuilder {
    /// Create a builder
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build options in use
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Run the pipeline over `documents`
    pub fn build(&self, documents: &[SchemaDocument]) -> BuildOutput {
        let options = &self.options;
        let mut registry = NamespaceRegistry::with_seeds(
            options
                .seed_namespaces
                .iter()
                .map(|(uri, prefix)| (uri.as_str(), prefix.as_str())),
        );

        let mut collection = collect_declarations(documents, &mut registry, &options.limits);
        let placeholders = resolve_references(
            std::mem::take(&mut collection.pending),
            &mut collection.elements,
            &registry,
        );
        let synthesized = match &options.synthetic {
            Some(rule) => infer_synthetic_elements(
                rule,
                &collection.tables,
                &mut collection.elements,
                &registry,
            ),
            None => 0,
        };

        let resolver = Resolver::new(&collection.tables, &registry, &options.limits);
        let mut diagnostics = Diagnostics::new();
        let mut elements = BTreeMap::new();

        for entry in collection.elements.values() {
            let key = entry.display_name();
            if elements.contains_key(&key) {
                continue;
            }
            let computed = assemble_element(&resolver, entry, &options.pass_through, &mut diagnostics);
            elements.insert(key, computed);
        }

        let referenced: BTreeSet<String> = elements
            .values()
            .flat_map(|entry: &ElementSchemaEntry| entry.children.iter().cloned())
            .collect();
        for child in referenced {
            elements.entry(child.clone()).or_insert_with(|| {
                let mut children = BTreeSet::new();
                let pass_through = options.pass_through.apply(&child, &mut children);
                ElementSchemaEntry {
                    children: children.into_iter().collect(),
                    attributes: AttributeMap::new(),
                    pass_through,
                }
            });
        }

        log::info!(
            "assembled {} elements from {} documents ({} placeholders, {} synthetic, {} warnings)",
            elements.len(),
            documents.len(),
            placeholders,
            synthesized,
            diagnostics.len()
        );

        BuildOutput {
            graph: SchemaGraph::new(registry.snapshot(), elements),
            diagnostics: diagnostics.into_vec(),
        }
    }
}

/// Children and attributes of one element entry
fn assemble_element<'a>(
    resolver: &Resolver<'_, 'a>,
    entry: &ElementEntry<'a>,
    pass_through: &PassThrough,
    diagnostics: &mut Diagnostics,
) -> ElementSchemaEntry {
    let element_namespace = entry.name.namespace.as_str();
    // An anonymous type wins over the type attribute
    let complex_type: Option<(&'a Node, &str)> = match entry.inline_type() {
        Some(node) => Some((node, element_namespace)),
        None => entry
            .type_name()
            .and_then(|type_name| resolver.resolve_type(type_name, element_namespace, diagnostics))
            .map(|declaration| (declaration.node, declaration.namespace)),
    };

    let mut children = BTreeSet::new();
    let mut attributes = AttributeMap::new();

    if let Some((node, namespace)) = complex_type {
        attributes = resolver.resolve_attributes(node, namespace, diagnostics);
        for particle in resolver.expand(node, namespace, diagnostics) {
            if let Some(child) = resolver.resolve_child_qname(&particle, namespace, diagnostics) {
                children.insert(child);
            }
        }
    }

    let injected = pass_through.apply(&entry.display_name(), &mut children);

    ElementSchemaEntry {
        children: children.into_iter().collect(),
        attributes,
        pass_through: injected,
    }
}

/// Build a graph with the OOXML defaults, discarding diagnostics
pub fn build_schema(documents: &[SchemaDocument]) -> SchemaGraph {
    SchemaBuilder::default().build(documents).graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::diagnostics::DiagnosticKind;

    const SCHEMA: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:w="urn:w" targetNamespace="urn:w">
        <xsd:complexType name="CT_P">
            <xsd:sequence>
                <xsd:element ref="w:r" minOccurs="0" maxOccurs="unbounded"/>
            </xsd:sequence>
            <xsd:attribute name="rsidR" type="xsd:hexBinary"/>
        </xsd:complexType>
        <xsd:complexType name="CT_R">
            <xsd:sequence>
                <xsd:element name="t" type="xsd:string"/>
            </xsd:sequence>
        </xsd:complexType>
        <xsd:complexType name="CT_Empty"/>
        <xsd:element name="p" type="CT_P"/>
        <xsd:element name="r" type="CT_R"/>
        <xsd:element name="misc" type="CT_Missing"/>
        <xsd:element name="inline">
            <xsd:complexType>
                <xsd:sequence><xsd:element ref="w:r"/></xsd:sequence>
            </xsd:complexType>
        </xsd:element>
    </xsd:schema>"#;

    fn documents() -> Vec<SchemaDocument> {
        vec![SchemaDocument::from_string(SCHEMA).unwrap()]
    }

    fn options() -> BuildOptions {
        BuildOptions::bare()
            .with_seed("urn:w", "w")
            .with_pass_through(PassThrough {
                markers: vec!["w:ins".to_string()],
                containers: vec!["w:body".to_string(), "w:p".to_string()],
            })
    }

    #[test]
    fn test_pass_through_apply() {
        let pass_through = PassThrough::default();
        let mut children = BTreeSet::new();
        assert!(pass_through.apply("w:t", &mut children).is_empty());
        assert!(children.is_empty());

        let injected = pass_through.apply("w:body", &mut children);
        assert_eq!(children.len(), PASS_THROUGH_MARKERS.len());
        assert_eq!(injected.len(), PASS_THROUGH_MARKERS.len());

        let mut children: BTreeSet<String> = ["w:t".to_string(), "w:proofErr".to_string()].into();
        let injected = pass_through.apply("w:r", &mut children);
        assert!(children.contains("w:sdt"));
        assert!(injected.contains(&"w:sdt".to_string()));
        assert!(!injected.contains(&"w:proofErr".to_string()));
    }

    #[test]
    fn test_build_children_and_attributes() {
        let output = SchemaBuilder::new(options()).build(&documents());
        let graph = output.graph;

        assert_eq!(graph.elements["w:p"].children, vec!["w:ins", "w:r"]);
        assert!(graph.elements["w:p"].attributes.contains_key("w:rsidR"));
        assert_eq!(graph.elements["w:r"].children, vec!["w:ins", "w:t"]);
        assert_eq!(graph.elements["w:inline"].children, vec!["w:ins", "w:r"]);
        assert_eq!(graph.elements["w:p"].pass_through, vec!["w:ins"]);
        assert!(graph.elements["w:p"].declares("w:r"));
    }

    #[test]
    fn test_referenced_children_get_entries() {
        let graph = SchemaBuilder::new(options()).build(&documents()).graph;
        assert!(graph.elements["w:t"].children.is_empty());
        assert!(graph.elements["w:ins"].children.is_empty());
    }

    #[test]
    fn test_unresolved_type_is_reported() {
        let output = SchemaBuilder::new(options()).build(&documents());
        assert!(output.graph.elements["w:misc"].children.is_empty());
        assert!(output
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnresolvedType && d.message.contains("CT_Missing")));
    }

    #[test]
    fn test_synthetic_elements_optional() {
        let graph = SchemaBuilder::new(options()).build(&documents()).graph;
        assert!(!graph.elements.contains_key("w:empty"));

        let with_rule = options().with_synthetic(Some(SyntheticElementRule::default()));
        let graph = SchemaBuilder::new(with_rule).build(&documents()).graph;
        assert!(graph.elements.contains_key("w:empty"));
    }

    #[test]
    fn test_namespace_table_included() {
        let graph = SchemaBuilder::new(options()).build(&documents()).graph;
        assert_eq!(graph.namespaces.get("urn:w").map(String::as_str), Some("w"));
    }
}
