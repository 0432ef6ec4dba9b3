//! Grok filter engine: registration-time compilation and the per-event
//! orchestration loop.
//!
//! ## Architecture
//!
//! The filter separates registration from evaluation:
//! - **Registration phase**: seed the registry, load extra pattern sources,
//!   compile every configured template, build per-field prefilters. Errors
//!   here are fatal — a broken pattern library cannot safely process events.
//! - **Evaluation phase**: synchronous, CPU-bound matching over one record at
//!   a time. Nothing is mutated except the record being filtered, so one
//!   filter instance serves any number of worker threads.
//!
//! For each configured target field, the loop tries the field's compiled
//! pattern set in order against each of the field's values, folds captures of
//! the first storing match into the record, honors break-on-first-match, and
//! tags the record on total failure.

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

use crate::compiler::Compiler;
use crate::config::GrokConfig;
use crate::error::Result;
use crate::matcher::{match_value, MatchOutcome};
use crate::merge;
use crate::pattern::CompiledPattern;
use crate::prefilter::SetPrefilter;
use crate::record::Record;
use crate::registry::PatternRegistry;

// Batches below this size are filtered sequentially.
const MIN_PARALLEL_BATCH: usize = 16;

/// One target field with its ordered, compiled pattern set.
struct FieldMatcher {
    field: String,
    patterns: Vec<CompiledPattern>,
    prefilter: Option<SetPrefilter>,
}

/// The grok filter.
///
/// Compiled once from a [`GrokConfig`]; immutable and `Send + Sync`
/// afterwards, so it can be shared across worker threads while each worker
/// filters its own records.
///
/// # Examples
///
/// ```rust
/// use grok_engine::{GrokConfig, GrokFilter, Record};
///
/// let config = GrokConfig::new()
///     .with_match("message", ["%{IP:client} %{WORD:method} %{URIPATHPARAM:request}"]);
/// let filter = GrokFilter::new(config)?;
///
/// let mut record = Record::from_message("55.3.244.1 GET /index.html");
/// filter.filter(&mut record);
///
/// assert_eq!(record.get("client").unwrap(), "55.3.244.1");
/// assert_eq!(record.get("method").unwrap(), "GET");
/// # Ok::<(), grok_engine::GrokError>(())
/// ```
pub struct GrokFilter {
    config: GrokConfig,
    registry: PatternRegistry,
    targets: Vec<FieldMatcher>,
}

impl GrokFilter {
    /// Build a filter from a configuration.
    ///
    /// Pattern sources load in override order: built-in library, then each
    /// `patterns_dir` in list order, then inline `pattern_definitions`.
    /// Every configured template is compiled here.
    ///
    /// # Errors
    /// Any [`GrokError`](crate::GrokError) raised while loading sources or
    /// compiling templates; all are fatal to construction.
    pub fn new(config: GrokConfig) -> Result<Self> {
        let mut registry = PatternRegistry::with_defaults();
        for dir in &config.patterns_dir {
            registry.load_dir(dir)?;
        }
        for (name, body) in &config.pattern_definitions {
            registry.define(name.clone(), body.clone());
        }

        let compiler = Compiler::new();
        let mut targets = Vec::new();
        for (field, templates) in &config.match_patterns {
            if templates.is_empty() {
                continue;
            }
            let mut patterns = Vec::with_capacity(templates.len());
            for template in templates {
                patterns.push(compiler.compile(template, &registry)?);
            }
            let prefilter = if config.enable_prefilter {
                Some(SetPrefilter::from_patterns(&patterns))
            } else {
                None
            };
            targets.push(FieldMatcher {
                field: field.clone(),
                patterns,
                prefilter,
            });
        }

        debug!(
            fields = targets.len(),
            patterns = targets.iter().map(|t| t.patterns.len()).sum::<usize>(),
            definitions = registry.len(),
            "compiled grok filter"
        );

        Ok(Self {
            config,
            registry,
            targets,
        })
    }

    /// Filter one record in place.
    ///
    /// All signaling is via field mutation and tags: extracted captures are
    /// merged into the record, and if no pattern stored anything, each
    /// configured failure tag is added once.
    pub fn filter(&self, record: &mut Record) {
        let mut matched_any = false;

        'pass: for target in &self.targets {
            for value in field_values(record, &target.field) {
                if self.try_value(record, target, &value) {
                    matched_any = true;
                    if self.config.break_on_match {
                        break 'pass;
                    }
                }
            }
        }

        if !matched_any {
            for tag in &self.config.tag_on_failure {
                record.add_tag(tag);
            }
        }
    }

    /// Filter a batch of independent records, in parallel for large batches.
    ///
    /// Equivalent to calling [`filter`](Self::filter) on each record; the
    /// filter itself is shared read-only across workers.
    pub fn filter_batch(&self, records: &mut [Record]) {
        if records.len() < MIN_PARALLEL_BATCH {
            for record in records.iter_mut() {
                self.filter(record);
            }
        } else {
            records.par_iter_mut().for_each(|record| self.filter(record));
        }
    }

    /// Try one value of one target field against the field's pattern set.
    ///
    /// Returns whether a pattern matched and stored at least one capture.
    fn try_value(&self, record: &mut Record, target: &FieldMatcher, value: &str) -> bool {
        let candidates = target.prefilter.as_ref().map(|p| p.candidates(value));

        for (index, pattern) in target.patterns.iter().enumerate() {
            if let Some(candidates) = &candidates {
                if !candidates[index] {
                    continue;
                }
            }

            match match_value(pattern, value) {
                Ok(MatchOutcome::NoMatch) => {}
                Ok(MatchOutcome::Matched(captures)) => {
                    if merge::apply_captures(record, &target.field, value, &captures, &self.config)
                    {
                        return true;
                    }
                }
                Err(e) => {
                    // Recovered: one bad attempt never aborts the pass.
                    warn!(
                        field = %target.field,
                        template = pattern.template(),
                        error = %e,
                        "match engine failure, treating as no match"
                    );
                }
            }
        }

        false
    }

    /// The configuration this filter was built from.
    pub fn config(&self) -> &GrokConfig {
        &self.config
    }

    /// The registry after all sources were loaded.
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Total number of compiled patterns across all target fields.
    pub fn pattern_count(&self) -> usize {
        self.targets.iter().map(|t| t.patterns.len()).sum()
    }
}

/// A field's values as text: a scalar becomes a one-element sequence,
/// non-string scalars are stringified, nested structures are skipped.
fn field_values(record: &Record, field: &str) -> Vec<String> {
    match record.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(value) => value_text(value).into_iter().collect(),
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter_for(config: GrokConfig) -> GrokFilter {
        GrokFilter::new(config).unwrap()
    }

    #[test]
    fn test_filter_extracts_fields() {
        let filter = filter_for(
            GrokConfig::new().with_match("message", ["%{IP:client} %{WORD:method}"]),
        );

        let mut record = Record::from_message("10.1.2.3 GET extra");
        filter.filter(&mut record);

        assert_eq!(record.get("client").unwrap(), "10.1.2.3");
        assert_eq!(record.get("method").unwrap(), "GET");
        assert!(record.tags().is_empty());
    }

    #[test]
    fn test_filter_tags_on_failure() {
        let filter = filter_for(GrokConfig::new().with_match("message", ["%{IP:client}"]));

        let mut record = Record::from_message("no address here");
        filter.filter(&mut record);

        assert!(record.get("client").is_none());
        assert_eq!(record.tags(), ["_grokparsefailure"]);
    }

    #[test]
    fn test_filter_tries_patterns_in_order() {
        let filter = filter_for(GrokConfig::new().with_match(
            "message",
            ["%{IP:client}", "%{WORD:first}"],
        ));

        let mut record = Record::from_message("hello world");
        filter.filter(&mut record);

        // First pattern misses, second one wins.
        assert!(record.get("client").is_none());
        assert_eq!(record.get("first").unwrap(), "hello");
    }

    #[test]
    fn test_break_on_match_stops_after_first_value() {
        let config = GrokConfig::new()
            .with_match("first", ["%{WORD:a}"])
            .with_match("second", ["%{WORD:b}"]);
        let filter = filter_for(config);

        let mut record = Record::new();
        record.set("first", "alpha");
        record.set("second", "beta");
        filter.filter(&mut record);

        // Fields iterate in sorted order; "first" matches and ends the pass.
        assert_eq!(record.get("a").unwrap(), "alpha");
        assert!(record.get("b").is_none());
    }

    #[test]
    fn test_all_fields_tried_without_break_on_match() {
        let config = GrokConfig::new()
            .with_match("first", ["%{WORD:a}"])
            .with_match("second", ["%{WORD:b}"])
            .with_break_on_match(false);
        let filter = filter_for(config);

        let mut record = Record::new();
        record.set("first", "alpha");
        record.set("second", "beta");
        filter.filter(&mut record);

        assert_eq!(record.get("a").unwrap(), "alpha");
        assert_eq!(record.get("b").unwrap(), "beta");
    }

    #[test]
    fn test_array_values_each_tried() {
        let config = GrokConfig::new()
            .with_match("lines", ["%{INT:n}"])
            .with_break_on_match(false);
        let filter = filter_for(config);

        let mut record = Record::new();
        record.set("lines", json!(["1", "two", "3"]));
        filter.filter(&mut record);

        // "1" stores a scalar, "two" never matches, "3" converts to a list.
        assert_eq!(record.get("n").unwrap(), &json!(["1", "3"]));
    }

    #[test]
    fn test_numeric_scalar_is_stringified() {
        let config = GrokConfig::new().with_match("status", ["%{INT:code:int}"]);
        let filter = filter_for(config);

        let mut record = Record::new();
        record.set("status", 404);
        filter.filter(&mut record);

        assert_eq!(record.get("code").unwrap(), &json!(404));
    }

    #[test]
    fn test_absent_field_fails_cleanly() {
        let filter = filter_for(GrokConfig::new().with_match("missing", ["%{WORD:w}"]));

        let mut record = Record::from_message("something");
        filter.filter(&mut record);

        assert_eq!(record.tags(), ["_grokparsefailure"]);
    }

    #[test]
    fn test_failure_tags_added_once_each() {
        let filter = filter_for(
            GrokConfig::new()
                .with_match("message", ["%{IP:client}"])
                .with_tag_on_failure(["_fail", "_fail", "_other"]),
        );

        let mut record = Record::from_message("nope");
        filter.filter(&mut record);

        assert_eq!(record.tags(), ["_fail", "_other"]);
    }

    #[test]
    fn test_prefilter_does_not_change_results() {
        let templates = [
            "ERROR %{GREEDYDATA:error_message}",
            "WARN %{GREEDYDATA:warn_message}",
            "%{LOGLEVEL:level} %{GREEDYDATA:rest}",
        ];
        let with = filter_for(
            GrokConfig::new()
                .with_match("message", templates)
                .with_prefilter(true),
        );
        let without = filter_for(
            GrokConfig::new()
                .with_match("message", templates)
                .with_prefilter(false),
        );

        for line in [
            "ERROR disk is full",
            "WARN disk is filling",
            "INFO all is well",
            "not a log line at all",
        ] {
            let mut a = Record::from_message(line);
            let mut b = Record::from_message(line);
            with.filter(&mut a);
            without.filter(&mut b);
            assert_eq!(a, b, "prefilter changed the outcome for {line:?}");
        }
    }

    #[test]
    fn test_filter_batch_matches_serial_filtering() {
        let filter = filter_for(
            GrokConfig::new().with_match("message", ["%{IP:client} %{WORD:method}"]),
        );

        let lines: Vec<String> = (0..40)
            .map(|i| format!("10.0.0.{} GET", i % 250))
            .collect();

        let mut batch: Vec<Record> = lines.iter().map(Record::from_message).collect();
        let mut serial: Vec<Record> = lines.iter().map(Record::from_message).collect();

        filter.filter_batch(&mut batch);
        for record in &mut serial {
            filter.filter(record);
        }

        assert_eq!(batch, serial);
    }

    #[test]
    fn test_inline_definition_overrides_builtin() {
        let config = GrokConfig::new()
            .with_pattern_definition("WORD", "[a-z]+")
            .with_match("message", ["%{WORD:w}"]);
        let filter = filter_for(config);

        let mut record = Record::from_message("UPPER lower");
        filter.filter(&mut record);

        // The redefined WORD no longer matches uppercase.
        assert_eq!(record.get("w").unwrap(), "lower");
    }

    #[test]
    fn test_registration_errors_are_fatal() {
        let result = GrokFilter::new(
            GrokConfig::new().with_match("message", ["%{DOESNOTEXIST:x}"]),
        );
        assert!(result.is_err());

        let result = GrokFilter::new(
            GrokConfig::new()
                .with_pattern_definition("A", "%{B}")
                .with_pattern_definition("B", "%{A}")
                .with_match("message", ["%{A}"]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GrokFilter>();
    }
}
