//! Error types for ooxml-schema
//!
//! Only the ingest side of the crate is fallible: reading schema text,
//! loading files and persisting the derived grammar. The derivation engine
//! reports soft failures through [`crate::grammar::Diagnostics`] instead.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ooxml-schema operations
#[derive(Error, Debug)]
pub enum Error {
    /// Schema document is well-formed XML but not a usable schema
    #[error("invalid schema: {0}")]
    Parse(#[from] ParseError),

    /// A schema file or grammar file could not be read or written
    #[error("resource error: {0}")]
    Resource(String),

    /// Input larger than the configured limits allow
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema text is not well-formed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Serialized grammar could not be read or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural problem in a schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What is wrong
    pub message: String,
    /// Tag of the offending schema element
    pub element: Option<String>,
}

impl ParseError {
    /// Create a parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: None,
        }
    }

    /// Attach the offending element's tag
    pub fn at(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(f, "{} (at <{}>)", self.message, element),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}
