//! Display formatting: value → text shown in a cell, card or form.

use std::fmt::Write;

use serde_json::Value;

use crate::types::{FieldConfig, FieldFormat, FieldType};
use crate::value::{is_empty, to_bool, to_datetime, to_number, to_text};

impl FieldConfig {
    /// Render a value for display using the field's `format`, or a sensible
    /// default for its type. Empty values render as an empty string.
    pub fn display_value(&self, value: Option<&Value>) -> String {
        if is_empty(value) {
            return String::new();
        }
        let Some(value) = value else {
            return String::new();
        };

        if let Some(format) = &self.format {
            if let Some(text) = apply_format(format, value) {
                return text;
            }
        }

        match self.type_ {
            FieldType::Currency => {
                to_number(value).map_or_else(|| to_text(value), |n| format!("{n:.2}"))
            }
            FieldType::Percentage => {
                to_number(value).map_or_else(|| to_text(value), |n| format!("{n}%"))
            }
            FieldType::Date => to_datetime(value).map_or_else(
                || to_text(value),
                |dt| dt.date().format("%Y-%m-%d").to_string(),
            ),
            FieldType::Datetime => to_datetime(value).map_or_else(
                || to_text(value),
                |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
            ),
            FieldType::Boolean => match to_bool(value) {
                Some(true) => "Yes".to_string(),
                Some(false) => "No".to_string(),
                None => to_text(value),
            },
            FieldType::Select | FieldType::Multiselect => self.option_labels(value),
            _ => to_text(value),
        }
    }

    fn option_labels(&self, value: &Value) -> String {
        let label = |v: &Value| {
            let raw = to_text(v);
            self.option(&raw)
                .map(|o| o.display_label().to_string())
                .unwrap_or(raw)
        };
        match value {
            Value::Array(items) => items.iter().map(label).collect::<Vec<_>>().join(", "),
            other => label(other),
        }
    }
}

fn apply_format(format: &FieldFormat, value: &Value) -> Option<String> {
    match format {
        FieldFormat::Currency { code, decimals } => {
            let n = to_number(value)?;
            Some(format!("{code} {n:.prec$}", prec = *decimals))
        }
        FieldFormat::Percentage { decimals } => {
            let n = to_number(value)?;
            Some(format!("{n:.prec$}%", prec = *decimals))
        }
        FieldFormat::Number { decimals } => {
            let n = to_number(value)?;
            Some(format!("{n:.prec$}", prec = *decimals))
        }
        FieldFormat::Date { pattern } => {
            let dt = to_datetime(value)?;
            // a malformed pattern surfaces as fmt::Error rather than a panic
            let mut out = String::new();
            write!(out, "{}", dt.format(pattern)).ok()?;
            Some(out)
        }
        FieldFormat::Boolean {
            true_label,
            false_label,
        } => to_bool(value).map(|b| if b { true_label.clone() } else { false_label.clone() }),
    }
}
