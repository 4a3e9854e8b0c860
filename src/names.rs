//! XML name utilities
//!
//! Splitting of prefixed references, NCName checks and the small string
//! transformations the synthetic-element heuristic relies on.

use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\-\.0-9]*$")
        .expect("NCName pattern is valid")
});

/// Prefixes conventionally bound to the XML Schema namespace itself
pub const BUILTIN_TYPE_PREFIXES: [&str; 2] = ["xs", "xsd"];

/// Separator between prefix and local part of a QName
pub const PREFIX_SEPARATOR: char = ':';

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(PREFIX_SEPARATOR) {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Join a prefix and local name into `prefix:local`
pub fn join_qname(prefix: &str, local: &str) -> String {
    format!("{}{}{}", prefix, PREFIX_SEPARATOR, local)
}

/// True for `xs:string`, `xsd:int` and friends
pub fn is_builtin_type(type_name: &str) -> bool {
    match split_qname(type_name) {
        (Some(prefix), _) => BUILTIN_TYPE_PREFIXES.contains(&prefix),
        (None, _) => false,
    }
}

/// Lowercase the first character, leaving the rest untouched
pub fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
