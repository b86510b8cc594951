//! Value coercion and comparison.
//!
//! Record values are untyped JSON. These helpers coerce them according to a
//! field's declared type so that filtering and sorting agree on what "equal"
//! and "greater" mean.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::{FieldConfig, FieldType};

/// Missing, null, empty string, or empty list.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// String coercion used by text operators, search and grouping.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parse a date or date-time. Numbers are epoch milliseconds.
pub fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_datetime(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// Date portion only; time of day is discarded.
pub fn to_date(value: &Value) -> Option<NaiveDate> {
    to_datetime(value).map(|dt| dt.date())
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// A value projected onto a comparable domain.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Time(NaiveDateTime),
    Bool(bool),
    /// Position of a select option in its declared order
    Rank(i32),
    /// Lowercased text
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Time(_) => 1,
            Self::Bool(_) => 2,
            Self::Rank(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Rank(a), Self::Rank(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl FieldConfig {
    /// Project a value onto this field's comparison domain.
    ///
    /// Returns `None` for empty values and for values that do not coerce to
    /// the field's type; callers treat both as "no value".
    pub fn sort_key(&self, value: Option<&Value>) -> Option<SortKey> {
        if is_empty(value) {
            return None;
        }
        let value = value?;
        match self.type_ {
            t if t.is_numeric() => to_number(value).map(SortKey::Number),
            t if t.is_temporal() => to_datetime(value).map(SortKey::Time),
            FieldType::Boolean => to_bool(value).map(SortKey::Bool),
            FieldType::Select => {
                let text = to_text(value);
                Some(match self.option(&text) {
                    Some(opt) => SortKey::Rank(opt.order),
                    None => SortKey::Text(text.to_lowercase()),
                })
            }
            _ => Some(SortKey::Text(to_text(value).to_lowercase())),
        }
    }

    /// Equality as used by `equals`/`in`: typed for ordered and boolean
    /// fields, case-insensitive text otherwise.
    pub fn values_equal(&self, actual: &Value, expected: &Value) -> bool {
        match self.type_ {
            t if t.is_numeric() => match (to_number(actual), to_number(expected)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            t if t.is_temporal() => match (to_datetime(actual), to_datetime(expected)) {
                (Some(a), Some(b)) if self.type_ == FieldType::Date => a.date() == b.date(),
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            FieldType::Boolean => match (to_bool(actual), to_bool(expected)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            FieldType::Multiselect => multiselect_equal(actual, expected),
            _ => to_text(actual).to_lowercase() == to_text(expected).to_lowercase(),
        }
    }

    /// Ordering for range operators. `None` when either side fails to coerce.
    pub fn compare_values(&self, actual: &Value, bound: &Value) -> Option<Ordering> {
        match self.type_ {
            t if t.is_numeric() => Some(to_number(actual)?.total_cmp(&to_number(bound)?)),
            FieldType::Date => Some(to_date(actual)?.cmp(&to_date(bound)?)),
            FieldType::Datetime => Some(to_datetime(actual)?.cmp(&to_datetime(bound)?)),
            _ => None,
        }
    }
}

/// A scalar matches any element; a list must match as a set.
fn multiselect_equal(actual: &Value, expected: &Value) -> bool {
    let lower = |v: &Value| to_text(v).to_lowercase();
    let actual_items: Vec<String> = match actual {
        Value::Array(items) => items.iter().map(lower).collect(),
        other => vec![lower(other)],
    };
    match expected {
        Value::Array(wanted) => {
            wanted.len() == actual_items.len()
                && wanted.iter().all(|w| actual_items.contains(&lower(w)))
        }
        scalar => actual_items.contains(&lower(scalar)),
    }
}
