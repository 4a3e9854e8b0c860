//! Content-model expansion
//!
//! Flattens the particle tree of a complex type into the list of element
//! particles that may appear as its children:
//! - `sequence`, `choice` and `all` compositors are walked recursively
//! - `group` references are replaced by the group's content, resolved in
//!   the namespace the group was declared in
//! - `complexContent/extension` contributes the base type's content first
//!
//! Every step is bounded by [`Limits::max_content_depth`](crate::limits::Limits);
//! content past the bound is dropped silently.

use crate::documents::Node;
use crate::names::{join_qname, split_qname};
use crate::namespaces::NamespaceRegistry;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::types::Resolver;

/// Prefix used for an unprefixed name whose namespace has no registered prefix
pub const UNKNOWN_PREFIX: &str = "unknown";

/// Compositor tags in tie-break priority order
const COMPOSITORS: [&str; 3] = ["sequence", "choice", "all"];

/// An `element` particle found while flattening a content model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildParticle<'a> {
    /// The `element` node, either `name=` or `ref=` form
    pub node: &'a Node,
    /// Namespace in effect where the particle was declared
    pub context: Option<String>,
}

/// Prefix for an unprefixed name in `namespace`, or the `unknown` sentinel
pub fn fallback_prefix<'r>(registry: &'r NamespaceRegistry, namespace: &str) -> &'r str {
    registry.prefix_of(namespace).unwrap_or(UNKNOWN_PREFIX)
}

/// First compositor child of `body`, in `sequence > choice > all` order
fn compositor_of(body: &Node) -> Option<&Node> {
    COMPOSITORS
        .iter()
        .find_map(|tag| body.first_child_named(tag))
}

/// Particle root of a type or derivation body: a compositor, or failing
/// that a bare `group` reference
fn particle_root(body: &Node) -> Option<&Node> {
    compositor_of(body).or_else(|| body.first_child_named("group"))
}

/// Effective particle root of a complex type
///
/// The type's own particle, or for `complexContent` the particle of its
/// `extension` (preferred) or `restriction`. `None` for types without
/// element content, such as `simpleContent` types.
pub fn content_root(complex_type: &Node) -> Option<&Node> {
    if let Some(root) = particle_root(complex_type) {
        return Some(root);
    }

    let content = complex_type.first_child_named("complexContent")?;
    ["extension", "restriction"]
        .iter()
        .filter_map(|tag| content.first_child_named(tag))
        .find_map(particle_root)
}

impl<'t, 'a> Resolver<'t, 'a> {
    /// Flatten the content model of `complex_type` into element particles
    pub fn expand(
        &self,
        complex_type: &'a Node,
        context_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<ChildParticle<'a>> {
        let mut particles = Vec::new();
        self.expand_type(complex_type, context_namespace, 0, diagnostics, &mut particles);
        particles
    }

    fn expand_type(
        &self,
        complex_type: &'a Node,
        namespace: &str,
        chain: usize,
        diagnostics: &mut Diagnostics,
        out: &mut Vec<ChildParticle<'a>>,
    ) {
        let extension = complex_type
            .first_child_named("complexContent")
            .and_then(|content| content.first_child_named("extension"));

        if let Some(base) = extension.and_then(|ext| ext.attr("base")) {
            if self.limits.within_attribute_group_depth(chain + 1) {
                if let Some(base_type) = self.resolve_type(base, namespace, diagnostics) {
                    self.expand_type(base_type.node, base_type.namespace, chain + 1, diagnostics, out);
                }
            }
        }

        if let Some(root) = content_root(complex_type) {
            self.expand_root(root, namespace, 0, out);
        }
    }

    /// Expand a particle root found at `depth`; compositors count one level
    fn expand_root(&self, root: &'a Node, namespace: &str, depth: usize, out: &mut Vec<ChildParticle<'a>>) {
        if root.is("group") {
            self.expand_group(root, namespace, depth, out);
        } else {
            self.flatten(root, namespace, depth + 1, out);
        }
    }

    fn flatten(&self, compositor: &'a Node, namespace: &str, depth: usize, out: &mut Vec<ChildParticle<'a>>) {
        if !self.limits.within_content_depth(depth) {
            log::debug!("content model truncated at depth {}", depth);
            return;
        }

        for child in &compositor.children {
            match child.local_name() {
                "element" => out.push(ChildParticle {
                    node: child,
                    context: Some(namespace.to_string()),
                }),
                "sequence" | "choice" | "all" => self.flatten(child, namespace, depth + 1, out),
                "group" => self.expand_group(child, namespace, depth, out),
                _ => {}
            }
        }
    }

    fn expand_group(&self, group: &'a Node, namespace: &str, depth: usize, out: &mut Vec<ChildParticle<'a>>) {
        if group.attr("name").is_some() {
            if let Some(body) = compositor_of(group) {
                self.flatten(body, namespace, depth + 1, out);
            }
            return;
        }

        let Some(reference) = group.attr("ref") else {
            return;
        };
        let Some(declaration) = self.resolve_group(reference, namespace) else {
            return;
        };
        if let Some(body) = compositor_of(declaration.node) {
            self.flatten(body, declaration.namespace, depth + 1, out);
        }
    }

    /// Display name of a child particle
    ///
    /// `ref` particles keep their own prefix when the registry knows it and
    /// use the context namespace otherwise. `name` particles use their
    /// captured declaration context in preference to `ambient_namespace`.
    /// A `ref` with an unregistered prefix is dropped and reported.
    pub fn resolve_child_qname(
        &self,
        particle: &ChildParticle<'_>,
        ambient_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        let namespace = particle.context.as_deref().unwrap_or(ambient_namespace);

        if let Some(reference) = particle.node.attr("ref") {
            return match split_qname(reference) {
                (Some(prefix), local) => {
                    if self.registry.namespace_of_prefix(prefix).is_some() {
                        Some(join_qname(prefix, local))
                    } else {
                        diagnostics.warn(
                            DiagnosticKind::UnknownPrefix,
                            format!("Unknown prefix '{}' in element reference '{}'", prefix, reference),
                        );
                        None
                    }
                }
                (None, local) => Some(join_qname(fallback_prefix(self.registry, namespace), local)),
            };
        }

        let name = particle.node.attr("name")?;
        match split_qname(name) {
            (Some(_), _) => Some(name.to_string()),
            (None, local) => Some(join_qname(fallback_prefix(self.registry, namespace), local)),
        }
    }
}
