//! Non-fatal diagnostics emitted while deriving a grammar
//!
//! Nothing in the derivation engine aborts a build. Conditions a human may
//! want to act on (an unknown prefix, a complex type that cannot be found)
//! are collected here and mirrored to the `log` facade.

use std::collections::HashSet;
use std::fmt;

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A prefixed name used a prefix the namespace registry does not know
    UnknownPrefix,
    /// A type name resolved to neither a complex nor a simple type
    UnresolvedType,
}

impl DiagnosticKind {
    /// Get the kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnknownPrefix => "unknown-prefix",
            DiagnosticKind::UnresolvedType => "unresolved-type",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Ordered, de-duplicated collection of diagnostics
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    seen: HashSet<String>,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning; repeated messages are kept once
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        if self.seen.insert(message.clone()) {
            log::warn!("{}", message);
            self.entries.push(Diagnostic { kind, message });
        }
    }

    /// Number of distinct diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate diagnostics in the order they were first reported
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Consume the sink
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
