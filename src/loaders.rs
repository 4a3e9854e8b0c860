//! Schema loading
//!
//! Reads `.xsd` files from disk into [`SchemaDocument`]s. Directories are
//! read in file-name order so builds over the same bundle are repeatable.

use crate::documents::SchemaDocument;
use crate::error::{Error, Result};
use crate::limits::Limits;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of schema documents
pub const SCHEMA_EXTENSION: &str = "xsd";

/// Loader for schema files
#[derive(Debug, Clone)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load one schema file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<SchemaDocument> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        })?;

        // Check size limits
        self.limits.check_xml_size(content.len())?;

        let document = SchemaDocument::parse(&content)
            .map_err(|e| match e {
                Error::Xml(msg) => Error::Xml(format!("{}: {}", path.display(), msg)),
                other => other,
            })?
            .with_location(path.display().to_string());
        log::debug!("loaded {}", path.display());
        Ok(document)
    }

    /// Load every `.xsd` file directly inside `dir`, sorted by file name
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<SchemaDocument>> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::Resource(format!("Failed to read directory '{}': {}", dir.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == SCHEMA_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if paths.is_empty() {
            return Err(Error::Resource(format!(
                "No .{} files found in '{}'",
                SCHEMA_EXTENSION,
                dir.display()
            )));
        }

        paths.iter().map(|path| self.load_file(path)).collect()
    }

    /// Load a file or a directory
    pub fn load(&self, source: impl AsRef<Path>) -> Result<Vec<SchemaDocument>> {
        let source = source.as_ref();
        if source.is_dir() {
            self.load_dir(source)
        } else {
            Ok(vec![self.load_file(source)?])
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
