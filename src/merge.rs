//! Folds match captures into a record under the configured policies.
//!
//! Capture pairs are applied in matcher order through a fixed pipeline:
//! type coercion, whole-line suppression, named-only filtering, the
//! empty-value rule, then storage under the singles/array policy (or the
//! overwrite policy for fields configured to be replaced).
//!
//! Coercion is deliberately permissive, the stated rule being a
//! longest-leading-prefix parse with fallback to zero: `int` on `"42"` is
//! `42`, on `"42.5"` is `42`, on `"abc"` is `0`; `float` behaves the same
//! over decimal prefixes.

use serde_json::{Number, Value};

use crate::config::GrokConfig;
use crate::matcher::Capture;
use crate::pattern::TypeTag;
use crate::record::{Record, MESSAGE_FIELD};

/// Apply the captures of one successful match against `field` to the record.
///
/// `original_value` is the field value that was matched, used by the
/// whole-line suppression rule. Returns whether at least one capture was
/// actually stored.
pub fn apply_captures(
    record: &mut Record,
    field: &str,
    original_value: &str,
    captures: &[Capture<'_, '_>],
    config: &GrokConfig,
) -> bool {
    let mut stored = false;

    for capture in captures {
        let descriptor = capture.descriptor;

        // An anonymous capture of the entire default message field would
        // just duplicate the original line under the syntax name.
        if field == MESSAGE_FIELD && !descriptor.named && capture.text == original_value {
            continue;
        }

        if config.named_captures_only && !descriptor.named {
            continue;
        }

        let value = coerce(capture.text, descriptor.type_tag);
        if is_empty(&value) {
            if config.keep_empty_captures {
                store(record, descriptor.key(), Value::String(String::new()), config);
                stored = true;
            }
            continue;
        }

        store(record, descriptor.key(), value, config);
        stored = true;
    }

    stored
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn store(record: &mut Record, key: &str, value: Value, config: &GrokConfig) {
    if config.overwrite.iter().any(|f| f == key) {
        record.set(key, value);
        return;
    }
    if config.singles && record.get(key).is_none() {
        record.set(key, value);
    } else {
        record.get_or_insert_list(key).push(value);
    }
}

/// Coerce a captured substring according to its type tag.
fn coerce(text: &str, tag: Option<TypeTag>) -> Value {
    match tag {
        None => Value::String(text.to_string()),
        Some(TypeTag::Int) => Value::Number(Number::from(leading_int(text))),
        Some(TypeTag::Float) => {
            Value::Number(Number::from_f64(leading_float(text)).unwrap_or_else(|| Number::from(0)))
        }
    }
}

/// Longest leading `[+-]?digits` prefix as an integer, saturating on
/// overflow; `0` when no digits lead the text.
fn leading_int(text: &str) -> i64 {
    let bytes = text.as_bytes();
    let (negative, start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let digits = bytes[start.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit());

    let mut magnitude = 0i64;
    let mut any = false;
    for digit in digits {
        any = true;
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    if !any {
        0
    } else if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Longest leading `[+-]?digits[.digits]` prefix as a float; `0.0` when no
/// digits lead the text.
fn leading_float(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 {
            end = frac_end;
        }
    }

    let has_fraction = text[..end].contains('.');
    if int_digits == 0 && !has_fraction {
        return 0.0;
    }
    text[..end].parse::<f64>().unwrap_or(0.0)
}
