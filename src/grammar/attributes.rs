//! Attribute resolution
//!
//! Computes the merged attribute map of a complex type. Attributes of the
//! base type (through `complexContent` or `simpleContent` derivation) form
//! the baseline; attributes declared on the derivation body and on the type
//! itself are laid over them, so a local declaration replaces an inherited
//! one with the same name. `attributeGroup` references are followed
//! recursively and `anyAttribute` records the wildcard sentinel.

use crate::documents::Node;
use crate::graph::{
    AttributeDecl, AttributeMap, AttributeSpec, AttributeUse, REFERENCED_ATTRIBUTE_TYPE,
    WILDCARD_ATTRIBUTE,
};
use crate::names::{join_qname, split_qname};

use super::diagnostics::Diagnostics;
use super::groups::fallback_prefix;
use super::types::Resolver;

/// Type recorded for an attribute declared without any type information
const ANY_SIMPLE_TYPE: &str = "xsd:anySimpleType";

/// Derivation body (`extension` or `restriction`) of a content wrapper
fn derivation_body(content: &Node) -> Option<&Node> {
    content
        .first_child_named("extension")
        .or_else(|| content.first_child_named("restriction"))
}

fn attribute_type(attribute: &Node) -> String {
    if let Some(type_name) = attribute.attr("type") {
        return type_name.to_string();
    }
    attribute
        .first_child_named("simpleType")
        .and_then(|st| st.first_child_named("restriction"))
        .and_then(|restriction| restriction.attr("base"))
        .unwrap_or(ANY_SIMPLE_TYPE)
        .to_string()
}

fn attribute_use(attribute: &Node) -> AttributeUse {
    match attribute.attr("use") {
        Some("required") => AttributeUse::Required,
        _ if attribute.attr("default").is_some() => AttributeUse::Default,
        _ => AttributeUse::Optional,
    }
}

impl<'t, 'a> Resolver<'t, 'a> {
    /// Complete attribute map of `complex_type`
    pub fn resolve_attributes(
        &self,
        complex_type: &Node,
        context_namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        self.collect_type_attributes(complex_type, context_namespace, 0, diagnostics, &mut attributes);
        attributes
    }

    fn collect_type_attributes(
        &self,
        complex_type: &Node,
        namespace: &str,
        depth: usize,
        diagnostics: &mut Diagnostics,
        attributes: &mut AttributeMap,
    ) {
        if !self.limits.within_attribute_group_depth(depth) {
            log::debug!("base type chain truncated at depth {}", depth);
            return;
        }

        for wrapper in ["complexContent", "simpleContent"] {
            let Some(body) = complex_type
                .first_child_named(wrapper)
                .and_then(derivation_body)
            else {
                continue;
            };

            if let Some(base) = body.attr("base") {
                if let Some(base_type) = self.resolve_type(base, namespace, diagnostics) {
                    self.collect_type_attributes(
                        base_type.node,
                        base_type.namespace,
                        depth + 1,
                        diagnostics,
                        attributes,
                    );
                }
            }
            self.extract_attributes(body, namespace, depth, attributes);
        }

        self.extract_attributes(complex_type, namespace, depth, attributes);
    }

    /// Record the attribute particles directly under `body`
    fn extract_attributes(&self, body: &Node, namespace: &str, depth: usize, attributes: &mut AttributeMap) {
        for child in &body.children {
            match child.local_name() {
                "attribute" => self.extract_attribute(child, namespace, attributes),
                "attributeGroup" => {
                    let Some(reference) = child.attr("ref") else {
                        continue;
                    };
                    if !self.limits.within_attribute_group_depth(depth + 1) {
                        log::debug!("attribute group '{}' truncated at depth {}", reference, depth + 1);
                        continue;
                    }
                    if let Some(group) = self.resolve_attribute_group(reference, namespace) {
                        self.extract_attributes(group.node, group.namespace, depth + 1, attributes);
                    }
                }
                "anyAttribute" => {
                    attributes.insert(WILDCARD_ATTRIBUTE.to_string(), AttributeSpec::wildcard());
                }
                _ => {}
            }
        }
    }

    fn extract_attribute(&self, attribute: &Node, namespace: &str, attributes: &mut AttributeMap) {
        if let Some(name) = attribute.attr("name") {
            let key = self.qualify(name, namespace);
            if attribute.attr("use") == Some("prohibited") {
                attributes.remove(&key);
                return;
            }

            let decl = AttributeDecl {
                type_name: attribute_type(attribute),
                use_mode: attribute_use(attribute),
                default: attribute.attr("default").map(str::to_string),
                fixed: attribute.attr("fixed").map(str::to_string),
                reference: None,
            };
            attributes.insert(key, AttributeSpec::Declared(decl));
        } else if let Some(reference) = attribute.attr("ref") {
            let key = self.qualify(reference, namespace);
            let decl = AttributeDecl {
                type_name: REFERENCED_ATTRIBUTE_TYPE.to_string(),
                use_mode: attribute_use(attribute),
                default: attribute.attr("default").map(str::to_string),
                fixed: attribute.attr("fixed").map(str::to_string),
                reference: Some(reference.to_string()),
            };
            attributes.insert(key, AttributeSpec::Declared(decl));
        }
    }

    /// `prefix:local` for an attribute name, prefixing unqualified names
    /// with the current namespace's prefix
    fn qualify(&self, name: &str, namespace: &str) -> String {
        match split_qname(name) {
            (Some(_), _) => name.to_string(),
            (None, local) => join_qname(fallback_prefix(self.registry, namespace), local),
        }
    }
}
