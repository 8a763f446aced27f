//! Insights row normalization.
//!
//! Insights rows carry conversion metrics as nested lists such as
//! `"actions": [{"action_type": "purchase", "value": "5"}]`, and every metric
//! arrives as text. Two transforms turn them into flat, typed records:
//!
//! - [`Normalizer::flatten_actions`] replaces each action-bearing list with one
//!   key per entry (`action_purchase: "5"`)
//! - [`convert_numeric_fields`] turns numeric-looking text into JSON numbers
//!
//! Both are pure per-record transforms. Only insights rows go through them;
//! entity listings are returned as fetched.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};
use tracing::warn;

use super::Record;

/// Built-in action-bearing keys and the prefix of the keys they flatten into.
const DEFAULT_ACTION_KEYS: &[(&str, &str)] = &[
    ("actions", "action_"),
    ("action_values", "action_value_"),
    ("conversions", "conversion_"),
    ("conversion_values", "conversion_value_"),
    ("cost_per_action_type", "cost_per_action_"),
    ("cost_per_conversion", "cost_per_conversion_"),
    ("purchase_roas", "purchase_roas_"),
];

fn numeric_re() -> &'static Regex {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid numeric regex")
    })
}

/// Lookup table from an action-bearing key to its flat-name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionKeyTable {
    entries: Vec<(String, String)>,
}

impl ActionKeyTable {
    /// An empty table. Nothing is flattened until keys are added.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a key, or replace the prefix of an existing one.
    pub fn with(mut self, key: impl Into<String>, prefix: impl Into<String>) -> Self {
        let key = key.into();
        let prefix = prefix.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = prefix,
            None => self.entries.push((key, prefix)),
        }
        self
    }

    /// Prefix registered for `key`.
    pub fn prefix_for(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.as_str())
    }

    /// Registered `(key, prefix)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionKeyTable {
    fn default() -> Self {
        DEFAULT_ACTION_KEYS
            .iter()
            .fold(Self::empty(), |table, (key, prefix)| table.with(*key, *prefix))
    }
}

/// One `{action_type, value}` item of an action-bearing list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
    pub action_type: String,
    pub value: Value,
}

impl ActionEntry {
    /// Interpret a list item. Returns `None` when it is not an object, has no
    /// non-empty `action_type` string, or has no scalar `value`.
    ///
    /// Extra attribution fields (`1d_click`, `7d_click`, ...) are ignored.
    pub fn from_value(item: Value) -> Option<Self> {
        let Value::Object(mut map) = item else {
            return None;
        };

        let action_type = match map.remove("action_type") {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => return None,
        };

        let value = match map.remove("value") {
            Some(v @ (Value::String(_) | Value::Number(_))) => v,
            _ => return None,
        };

        Some(Self { action_type, value })
    }

    /// Flat key for this entry under `prefix`.
    pub fn flat_key(&self, prefix: &str) -> String {
        format!("{prefix}{}", sanitize_field_name(&self.action_type))
    }
}

/// Replace every character that is not an ASCII letter, digit or underscore.
///
/// `offsite_conversion.fb_pixel_purchase` becomes
/// `offsite_conversion_fb_pixel_purchase`.
fn sanitize_field_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Applies the flattening and numeric transforms to insights rows.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    table: ActionKeyTable,
}

impl Normalizer {
    pub fn new(table: ActionKeyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ActionKeyTable {
        &self.table
    }

    /// Flatten, then convert numeric text.
    pub fn normalize(&self, rows: Vec<Record>) -> Vec<Record> {
        convert_numeric_fields(self.flatten_actions(rows))
    }

    /// Flatten every action-bearing list into prefixed flat keys.
    pub fn flatten_actions(&self, rows: Vec<Record>) -> Vec<Record> {
        rows.into_iter()
            .map(|record| self.flatten_record(record))
            .collect()
    }

    /// Flatten a single record.
    ///
    /// The nested list is removed and each valid entry becomes
    /// `<prefix><action_type>`. Malformed entries are skipped one by one. A
    /// value under an action-bearing key that is not a list is kept as is.
    /// When two entries map to the same flat key the later one wins.
    pub fn flatten_record(&self, mut record: Record) -> Record {
        let mut flat = Vec::new();
        let mut kept = Vec::new();

        for (source_key, prefix) in self.table.iter() {
            match record.remove(source_key) {
                None => {}
                Some(Value::Array(items)) => {
                    for (index, item) in items.into_iter().enumerate() {
                        match ActionEntry::from_value(item) {
                            Some(entry) => flat.push((entry.flat_key(prefix), entry.value)),
                            None => warn!(
                                key = source_key,
                                index, "Skipping malformed action entry"
                            ),
                        }
                    }
                }
                Some(other) => kept.push((source_key.to_string(), other)),
            }
        }

        record.extend(kept);
        record.extend(flat);
        record
    }
}

/// Replace numeric-looking text values with numbers.
///
/// Text without a fractional part or exponent becomes an integer, anything
/// else a float. Numbers, booleans, nested values and other text are left
/// untouched, so applying this twice is the same as applying it once.
pub fn convert_numeric_fields(rows: Vec<Record>) -> Vec<Record> {
    rows.into_iter()
        .map(|mut record| {
            for value in record.values_mut() {
                let parsed = match value {
                    Value::String(text) => parse_number(text),
                    _ => None,
                };
                if let Some(number) = parsed {
                    *value = Value::Number(number);
                }
            }
            record
        })
        .collect()
}

/// Parse text that lexically represents a number.
///
/// Integers too large for 64 bits become the nearest float. Text whose value
/// overflows `f64` has no JSON number and stays text.
fn parse_number(text: &str) -> Option<Number> {
    if !numeric_re().is_match(text) {
        return None;
    }

    if text.contains(['.', 'e', 'E']) {
        return text.parse::<f64>().ok().and_then(Number::from_f64);
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(u.into());
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
