//! The derived grammar and its query surface
//!
//! A [`SchemaGraph`] is immutable once built. It can be written out as
//! pretty-printed JSON and read back, which lets the editor ship a
//! precomputed grammar instead of the XSD bundle.

mod model;
mod query;

pub use model::*;
pub use query::*;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

impl SchemaGraph {
    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON text
    ///
    /// Child lists are sorted and deduplicated, so a hand-edited grammar
    /// answers queries the same way a built one does.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut graph: SchemaGraph = serde_json::from_str(json)?;
        for entry in graph.elements.values_mut() {
            entry.children.sort();
            entry.children.dedup();
            entry.pass_through.sort();
            entry.pass_through.dedup();
        }
        Ok(graph)
    }

    /// Read a graph previously written with [`SchemaGraph::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("Failed to read grammar '{}': {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Write the graph as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|e| {
            Error::Resource(format!("Failed to write grammar '{}': {}", path.display(), e))
        })?;
        log::debug!("wrote {} elements to {}", self.elements.len(), path.display());
        Ok(())
    }
}
