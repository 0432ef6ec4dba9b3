//! Core data structures for compiled patterns.
//!
//! This module defines the artifacts produced by the compiler and consumed by
//! the matcher and merge engine: capture descriptors and compiled patterns.
//! Everything here is built once at registration time and is read-only for
//! the lifetime of the process.

use regex::Regex;

/// Numeric conversion requested by a `%{SYNTAX:SEMANTIC:TYPE}` token.
///
/// Absence of a type suffix means the captured substring is kept as a string.
/// Unknown suffix text is treated as no conversion at all, so a template like
/// `%{NUMBER:n:hex}` still compiles and captures `n` as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Float,
}

impl TypeTag {
    /// Parse a type suffix. Unknown suffixes yield `None` (no conversion).
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "int" => Some(TypeTag::Int),
            "float" => Some(TypeTag::Float),
            _ => None,
        }
    }
}

/// One extraction point of a compiled pattern.
///
/// A descriptor is produced once at compile time for every `%{…}` token, so
/// nothing about a capture key is re-parsed during matching. The generated
/// `group_name` keys the regex capture group the token was rewritten into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDescriptor {
    /// Generated regex group name (`g0`, `g1`, …) unique within the pattern.
    pub group_name: String,
    /// The referenced pattern name (`IP`, `WORD`, …).
    pub syntax: String,
    /// Semantic field name, if the token carried one.
    pub semantic: Option<String>,
    /// Requested numeric conversion, if any.
    pub type_tag: Option<TypeTag>,
    /// Raw key text as written in the template, including any type suffix
    /// (`"client:int"`), or the syntax name for anonymous tokens.
    pub raw_key: String,
    /// Whether the token carried a semantic name. Anonymous captures are
    /// still retrievable but subject to named-only filtering.
    pub named: bool,
}

impl CaptureDescriptor {
    /// Key under which a capture for this descriptor is stored in the record:
    /// the semantic name when present, otherwise the syntax name.
    pub fn key(&self) -> &str {
        self.semantic.as_deref().unwrap_or(&self.syntax)
    }
}

/// A fully expanded and compiled pattern template.
///
/// Built once per configured template by the [`Compiler`](crate::Compiler);
/// immutable thereafter and safe to share across threads for any number of
/// match calls.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    regex: Regex,
    captures: Vec<CaptureDescriptor>,
}

impl CompiledPattern {
    pub(crate) fn new(template: String, regex: Regex, captures: Vec<CaptureDescriptor>) -> Self {
        Self {
            template,
            regex,
            captures,
        }
    }

    /// The original template text this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The fully expanded regular expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Capture descriptors in the order their groups open in the regex.
    pub fn captures(&self) -> &[CaptureDescriptor] {
        &self.captures
    }
}
