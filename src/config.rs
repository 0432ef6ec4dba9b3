//! Configuration surface for the grok filter.
//!
//! All policies are plain data: the field→template map, extra pattern
//! sources, and the capture policies of the merge engine. A configuration is
//! consumed once by [`GrokFilter::new`](crate::GrokFilter::new); everything
//! compiled from it is immutable afterwards.
//!
//! # Examples
//!
//! ```rust
//! use grok_engine::GrokConfig;
//!
//! let config = GrokConfig::new()
//!     .with_match("message", ["%{IP:client} %{WORD:method}"])
//!     .with_break_on_match(true);
//!
//! assert_eq!(config.match_patterns["message"].len(), 1);
//! ```
//!
//! Or from a YAML document:
//!
//! ```rust
//! use grok_engine::GrokConfig;
//!
//! let config = GrokConfig::from_yaml(r#"
//! match:
//!   message:
//!     - "%{COMMONAPACHELOG}"
//! named_captures_only: true
//! tag_on_failure: ["_grokparsefailure"]
//! "#)?;
//!
//! assert!(config.named_captures_only);
//! # Ok::<(), grok_engine::GrokError>(())
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{GrokError, Result};

/// Tag added to a record when no configured pattern stored anything.
pub const DEFAULT_FAILURE_TAG: &str = "_grokparsefailure";

/// Grok filter configuration.
///
/// Field-name keys are ordered (`BTreeMap`), so orchestration across multiple
/// target fields is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrokConfig {
    /// Target field → ordered list of templates to try against it.
    #[serde(rename = "match")]
    pub match_patterns: BTreeMap<String, Vec<String>>,

    /// Inline pattern definitions, applied after every other source so they
    /// override both the built-in library and `patterns_dir` files.
    pub pattern_definitions: BTreeMap<String, String>,

    /// Extra pattern-file directories, loaded in list order after the
    /// built-in library.
    pub patterns_dir: Vec<PathBuf>,

    /// Stop the entire pass at the first value that stores a capture.
    pub break_on_match: bool,

    /// Keep only captures whose token carried a semantic name.
    pub named_captures_only: bool,

    /// Record an empty placeholder for captures that matched nothing.
    pub keep_empty_captures: bool,

    /// Store a first capture for an absent field as a scalar instead of a
    /// one-element list.
    pub singles: bool,

    /// Fields whose captures replace the existing value instead of
    /// appending to it.
    pub overwrite: Vec<String>,

    /// Tags added (idempotently) when the whole pass stores nothing.
    pub tag_on_failure: Vec<String>,

    /// Skip patterns whose required literals are absent from the value.
    pub enable_prefilter: bool,
}

impl Default for GrokConfig {
    fn default() -> Self {
        Self {
            match_patterns: BTreeMap::new(),
            pattern_definitions: BTreeMap::new(),
            patterns_dir: Vec::new(),
            break_on_match: true,
            named_captures_only: true,
            keep_empty_captures: false,
            singles: true,
            overwrite: Vec::new(),
            tag_on_failure: vec![DEFAULT_FAILURE_TAG.to_string()],
            enable_prefilter: true,
        }
    }
}

impl GrokConfig {
    /// Create a configuration with default policies and no match patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a YAML document.
    ///
    /// # Errors
    /// Returns [`GrokError::ConfigError`] if the document is malformed.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| GrokError::ConfigError(e.to_string()))
    }

    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    /// Returns [`GrokError::ConfigError`] if the document is malformed.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GrokError::ConfigError(e.to_string()))
    }

    /// Append templates to a target field's pattern set.
    pub fn with_match(
        mut self,
        field: impl Into<String>,
        templates: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.match_patterns
            .entry(field.into())
            .or_default()
            .extend(templates.into_iter().map(Into::into));
        self
    }

    /// Add an inline pattern definition.
    pub fn with_pattern_definition(
        mut self,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.pattern_definitions.insert(name.into(), body.into());
        self
    }

    /// Add a pattern-file directory.
    pub fn with_patterns_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.patterns_dir.push(path.into());
        self
    }

    /// Enable or disable break-on-first-match.
    pub fn with_break_on_match(mut self, enable: bool) -> Self {
        self.break_on_match = enable;
        self
    }

    /// Enable or disable named-only capture filtering.
    pub fn with_named_captures_only(mut self, enable: bool) -> Self {
        self.named_captures_only = enable;
        self
    }

    /// Enable or disable empty-capture placeholders.
    pub fn with_keep_empty_captures(mut self, enable: bool) -> Self {
        self.keep_empty_captures = enable;
        self
    }

    /// Enable or disable scalar-first storage.
    pub fn with_singles(mut self, enable: bool) -> Self {
        self.singles = enable;
        self
    }

    /// Set the fields whose captures replace instead of append.
    pub fn with_overwrite(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.overwrite = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the failure tags.
    pub fn with_tag_on_failure(
        mut self,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.tag_on_failure = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable literal prefiltering.
    pub fn with_prefilter(mut self, enable: bool) -> Self {
        self.enable_prefilter = enable;
        self
    }
}
