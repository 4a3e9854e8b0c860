//! # ooxml-schema
//!
//! Derives a queryable element/attribute grammar for Office Open XML from its
//! XSD schemas.
//!
//! The XSD bundle is walked once to produce a [`SchemaGraph`]: for every
//! known element, the child elements it may contain and the attributes it
//! may carry. This is not a validator. It is the structural knowledge an
//! editor needs to round-trip WordprocessingML markup it has no explicit
//! handler for.
//!
//! ## Features
//!
//! - Declaration indexing across namespaces, including inline elements
//! - Content-model flattening through compositors, groups and extensions
//! - Attribute inheritance through derivation and attribute groups
//! - Deterministic output, persisted as JSON
//! - Queries for allowed children, attributes, tags and block/inline class
//!
//! ## Example
//!
//! ```rust,ignore
//! use ooxml_schema::{build_schema, loaders::Loader};
//!
//! let documents = Loader::new().load_dir("schemas/ooxml")?;
//! let graph = build_schema(&documents);
//!
//! assert!(graph.is_allowed_child("w:p", "w:r"));
//! graph.save("wml-grammar.json")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and namespaces
pub mod namespaces;
pub mod names;

// Schema ingest
pub mod documents;
pub mod loaders;

// Derivation and the derived grammar
pub mod grammar;
pub mod graph;

// Re-exports for convenience
pub use error::{Error, Result};
pub use grammar::{build_schema, BuildOptions, SchemaBuilder};
pub use graph::SchemaGraph;

/// Version of the ooxml-schema library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
