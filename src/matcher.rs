//! Applies compiled patterns to text values.
//!
//! The matcher is the compile-once / match-many boundary: a
//! [`CompiledPattern`] is applied to one text value and yields either
//! [`MatchOutcome::NoMatch`] or the ordered captures recorded in the
//! pattern's capture map. Engine-reported failures surface as
//! [`GrokError::MatchEngine`](crate::GrokError::MatchEngine) and are
//! recovered by the orchestrator, never propagated as a crash.

use crate::error::Result;
use crate::pattern::{CaptureDescriptor, CompiledPattern};

/// One extracted capture: the compile-time descriptor plus the matched text.
#[derive(Debug, Clone, Copy)]
pub struct Capture<'p, 't> {
    pub descriptor: &'p CaptureDescriptor,
    pub text: &'t str,
}

/// Result of applying a compiled pattern to one text value.
#[derive(Debug, Clone)]
pub enum MatchOutcome<'p, 't> {
    /// The pattern did not match the value.
    NoMatch,
    /// The pattern matched; captures appear in capture-map order. Groups
    /// that did not participate in the match are omitted; groups that
    /// matched the empty string are included.
    Matched(Vec<Capture<'p, 't>>),
}

impl MatchOutcome<'_, '_> {
    /// Whether the pattern matched at all.
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// Apply `pattern` to `text`.
///
/// # Errors
/// Returns [`GrokError::MatchEngine`](crate::GrokError::MatchEngine) if the
/// regex engine reports a failure while evaluating the value. The bundled
/// engine evaluates without failure modes, so this is a boundary contract for
/// the orchestrator's recovery path rather than an expected outcome.
pub fn match_value<'p, 't>(
    pattern: &'p CompiledPattern,
    text: &'t str,
) -> Result<MatchOutcome<'p, 't>> {
    let Some(caps) = pattern.regex().captures(text) else {
        return Ok(MatchOutcome::NoMatch);
    };

    let mut captures = Vec::with_capacity(pattern.captures().len());
    for descriptor in pattern.captures() {
        if let Some(group) = caps.name(&descriptor.group_name) {
            captures.push(Capture {
                descriptor,
                text: group.as_str(),
            });
        }
    }

    Ok(MatchOutcome::Matched(captures))
}
