//! Limits and constraints for schema derivation
//!
//! Every recursion in the engine is bounded by one of these limits so that
//! cyclic or pathologically nested schema fragments terminate.

use crate::error::{Error, Result};

/// Depth bound shared by inline element discovery and content-model expansion
pub const DEFAULT_CONTENT_DEPTH: usize = 10;

/// Global limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of particles walked when discovering inline elements
    /// and when flattening a content model
    pub max_content_depth: usize,

    /// Maximum chain length for attribute group references and base types
    pub max_attribute_group_depth: usize,

    /// Maximum schema file size in bytes
    pub max_xml_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_content_depth: DEFAULT_CONTENT_DEPTH,
            max_attribute_group_depth: 32,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_content_depth: 6,
            max_attribute_group_depth: 8,
            max_xml_size: 10 * 1024 * 1024, // 10 MB
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_content_depth: 64,
            max_attribute_group_depth: 256,
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
        }
    }

    /// Set the content depth bound
    pub fn with_content_depth(mut self, depth: usize) -> Self {
        self.max_content_depth = depth;
        self
    }

    /// Whether a particle at `depth` is still inside the content bound
    pub fn within_content_depth(&self, depth: usize) -> bool {
        depth <= self.max_content_depth
    }

    /// Whether an attribute group / base type chain of `depth` may be followed
    pub fn within_attribute_group_depth(&self, depth: usize) -> bool {
        depth <= self.max_attribute_group_depth
    }

    /// Check if schema size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }
}
