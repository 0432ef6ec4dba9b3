//! Literal prefilter for per-field pattern sets.
//!
//! Templates usually carry verbatim text between `%{…}` tokens ("took=",
//! "ERROR ", …). A value that does not contain that text cannot match the
//! pattern, so the regex engine never needs to see it. This module extracts
//! such *required literals* at registration time and answers, per incoming
//! value, which patterns of a set are still candidates.
//!
//! Extraction is conservative and never unsound: a verbatim segment only
//! qualifies when every character is plain literal text, and a template with
//! alternation or grouping anywhere in its verbatim text contributes no
//! literals at all. Prefiltering therefore only skips attempts that cannot
//! succeed; it never changes attempt order or outcomes.
//!
//! Strategy selection mirrors set size: plain substring scans for small
//! literal sets, one AhoCorasick automaton above [`AHOCORASICK_THRESHOLD`].

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::pattern::CompiledPattern;

// Threshold for switching between simple matching and AhoCorasick
const AHOCORASICK_THRESHOLD: usize = 8;

// Shorter runs are too common to reject anything
const MIN_LITERAL_LEN: usize = 2;

/// Prefilter over one ordered pattern set.
#[derive(Debug, Clone)]
pub struct SetPrefilter {
    strategy: PrefilterStrategy,
    /// Literal ids each pattern requires; empty means always a candidate.
    required: Vec<Vec<usize>>,
    stats: PrefilterStats,
}

#[derive(Debug, Clone)]
enum PrefilterStrategy {
    /// No pattern contributed literals; everything is always a candidate.
    Passthrough,
    /// Substring scan per literal for small sets.
    Simple { literals: Vec<String> },
    /// AhoCorasick automaton for large sets.
    AhoCorasick {
        automaton: AhoCorasick,
        literal_count: usize,
    },
}

/// Statistics about a set prefilter's coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefilterStats {
    /// Number of patterns in the set.
    pub pattern_count: usize,
    /// Number of unique required literals across the set.
    pub literal_count: usize,
    /// Patterns that contributed no literals and are never skipped.
    pub passthrough_count: usize,
}

impl PrefilterStats {
    /// Whether the prefilter can skip anything at all.
    pub fn is_effective(&self) -> bool {
        self.literal_count > 0
    }
}

impl SetPrefilter {
    /// Build a prefilter over an ordered pattern set.
    pub fn from_patterns(patterns: &[CompiledPattern]) -> Self {
        let mut literals: Vec<String> = Vec::new();
        let mut required = Vec::with_capacity(patterns.len());
        let mut passthrough_count = 0;

        for pattern in patterns {
            let found = required_literals(pattern.template());
            if found.is_empty() {
                passthrough_count += 1;
            }
            let ids = found
                .into_iter()
                .map(|literal| match literals.iter().position(|l| *l == literal) {
                    Some(id) => id,
                    None => {
                        literals.push(literal);
                        literals.len() - 1
                    }
                })
                .collect();
            required.push(ids);
        }

        let stats = PrefilterStats {
            pattern_count: patterns.len(),
            literal_count: literals.len(),
            passthrough_count,
        };

        let strategy = if literals.is_empty() {
            PrefilterStrategy::Passthrough
        } else if literals.len() < AHOCORASICK_THRESHOLD {
            PrefilterStrategy::Simple { literals }
        } else {
            let literal_count = literals.len();
            match AhoCorasickBuilder::new()
                .match_kind(MatchKind::Standard)
                .build(&literals)
            {
                Ok(automaton) => PrefilterStrategy::AhoCorasick {
                    automaton,
                    literal_count,
                },
                // Automaton limits exceeded: fall back to scanning.
                Err(_) => PrefilterStrategy::Simple { literals },
            }
        };

        Self {
            strategy,
            required,
            stats,
        }
    }

    /// For each pattern of the set, whether `value` can still match it.
    pub fn candidates(&self, value: &str) -> Vec<bool> {
        let present = match &self.strategy {
            PrefilterStrategy::Passthrough => {
                return vec![true; self.required.len()];
            }
            PrefilterStrategy::Simple { literals } => literals
                .iter()
                .map(|literal| value.contains(literal.as_str()))
                .collect::<Vec<bool>>(),
            PrefilterStrategy::AhoCorasick {
                automaton,
                literal_count,
            } => {
                let mut present = vec![false; *literal_count];
                for hit in automaton.find_overlapping_iter(value) {
                    present[hit.pattern().as_usize()] = true;
                }
                present
            }
        };

        self.required
            .iter()
            .map(|ids| ids.iter().all(|&id| present[id]))
            .collect()
    }

    /// Coverage statistics for this set.
    pub fn stats(&self) -> &PrefilterStats {
        &self.stats
    }
}

/// Extract the required literals of a template.
///
/// Splits the template into verbatim segments around `%{…}` tokens. A
/// segment qualifies only if every character is plain literal text; a
/// template whose verbatim text contains alternation or grouping anywhere
/// yields no literals, since an earlier segment might then be optional.
fn required_literals(template: &str) -> Vec<String> {
    let segments = verbatim_segments(template);

    if segments
        .iter()
        .any(|s| s.contains(['|', '(', ')']))
    {
        return Vec::new();
    }

    segments
        .into_iter()
        .filter(|s| s.chars().count() >= MIN_LITERAL_LEN && s.chars().all(is_literal_char))
        .collect()
}

/// Text outside `%{…}` tokens, split at token boundaries.
fn verbatim_segments(template: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        current.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                rest = &rest[start + end + 1..];
            }
            None => {
                // Unterminated token text is verbatim.
                current.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    current.push_str(rest);
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '_' | '-' | ',' | ':' | ';' | '/' | '=' | '@' | '<' | '>' | '!' | '%' | '"'
                | '\''
        )
}
