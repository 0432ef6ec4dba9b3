//! Structured output record populated by the filter.
//!
//! A record maps field names to JSON scalars or arrays of scalars, plus a tag
//! collection with idempotent insertion. Records are created per input event,
//! mutated in place by the filter, and never shared between workers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field that holds the raw event text by convention.
pub const MESSAGE_FIELD: &str = "message";

/// A single event's structured fields and tags.
///
/// # Examples
///
/// ```rust
/// use grok_engine::Record;
///
/// let mut record = Record::from_message("55.3.244.1 GET /index.html");
/// record.set("client", "55.3.244.1");
/// record.add_tag("parsed");
///
/// assert_eq!(record.get("client").unwrap(), "55.3.244.1");
/// assert!(record.has_tag("parsed"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    fields: HashMap<String, Value>,
    #[serde(default)]
    tags: Vec<String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record whose [`MESSAGE_FIELD`] holds the given event text.
    pub fn from_message(message: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.set(MESSAGE_FIELD, message.into());
        record
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value, replacing any prior value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get the field as a mutable list, inserting an empty list if the field
    /// is absent and converting a pre-existing scalar to a one-element list.
    ///
    /// This is the record's explicit get-or-insert-default operation: once a
    /// field holds a list, later captures append rather than overwrite.
    pub fn get_or_insert_list(&mut self, name: &str) -> &mut Vec<Value> {
        let entry = self
            .fields
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            let prior = entry.take();
            *entry = Value::Array(vec![prior]);
        }
        match entry {
            Value::Array(items) => items,
            _ => unreachable!("entry was just made an array"),
        }
    }

    /// All fields of the record.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Add a tag. Adding a tag that is already present is a no-op.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Whether the tag collection contains `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}
