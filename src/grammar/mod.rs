//! Grammar derivation
//!
//! The passes that turn a set of [`SchemaDocument`](crate::documents::SchemaDocument)s
//! into a [`SchemaGraph`](crate::graph::SchemaGraph), in pipeline order:
//!
//! - [`globals`]: declaration tables, element entries and pending references
//! - [`references`]: element reference resolution
//! - [`synthetic`]: element inference from complex type names
//! - [`types`]: complex type, group and attribute group lookup
//! - [`groups`]: content-model expansion
//! - [`attributes`]: attribute resolution
//! - [`builders`]: assembly of the final graph

pub mod attributes;
pub mod builders;
pub mod diagnostics;
pub mod globals;
pub mod groups;
pub mod references;
pub mod synthetic;
pub mod types;

pub use builders::{build_schema, BuildOptions, BuildOutput, PassThrough, SchemaBuilder};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use globals::{collect_declarations, Collection, DeclarationTables, ElementEntry, ElementSource};
pub use groups::{content_root, ChildParticle, UNKNOWN_PREFIX};
pub use synthetic::SyntheticElementRule;
pub use types::Resolver;
