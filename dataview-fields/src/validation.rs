//! Value validation against a field's declared rules.
//!
//! `ValidationRules::check` runs when a schema is built and rejects rules
//! that can never be satisfied. `FieldConfig::validate_value` runs against
//! individual values, typically before a collaborator writes an edit back.

use regex::Regex;
use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::types::{FieldConfig, FieldType, ValidationRules};
use crate::value::{is_empty, to_bool, to_datetime, to_number, to_text};

impl ValidationRules {
    /// Reject contradictory bounds and patterns that do not compile.
    pub fn check(&self, key: &str) -> Result<()> {
        let invalid = |message: String| FieldsError::InvalidValidation {
            key: key.to_string(),
            message,
        };
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(invalid(format!("min {min} exceeds max {max}")));
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(invalid(format!(
                    "min_length {min} exceeds max_length {max}"
                )));
            }
        }
        if let Some(pattern) = &self.pattern {
            Regex::new(pattern).map_err(|e| invalid(format!("bad pattern: {e}")))?;
        }
        Ok(())
    }
}

impl FieldConfig {
    /// Validate a single value against this field's type and rules.
    pub fn validate_value(&self, value: Option<&Value>) -> Result<()> {
        if is_empty(value) {
            if self.required {
                return Err(FieldsError::validation(&self.key, "is required"));
            }
            return Ok(());
        }
        let Some(value) = value else {
            return Ok(());
        };

        self.validate_shape(value)?;

        if let Some(rules) = &self.validation {
            self.validate_rules(rules, value)?;
        }
        Ok(())
    }

    fn validate_shape(&self, value: &Value) -> Result<()> {
        let ok = match self.type_ {
            t if t.is_numeric() => to_number(value).is_some(),
            t if t.is_temporal() => to_datetime(value).is_some(),
            FieldType::Boolean => to_bool(value).is_some(),
            FieldType::Select => self.option(&to_text(value)).is_some(),
            FieldType::Multiselect => match value {
                Value::Array(items) => items.iter().all(|v| self.option(&to_text(v)).is_some()),
                other => self.option(&to_text(other)).is_some(),
            },
            FieldType::Email => {
                let text = to_text(value);
                matches!(text.split_once('@'), Some((user, host)) if !user.is_empty() && host.contains('.'))
            }
            FieldType::Url => {
                let text = to_text(value);
                text.starts_with("http://") || text.starts_with("https://")
            }
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(FieldsError::validation(
                &self.key,
                format!("'{}' is not a valid {}", to_text(value), self.type_),
            ))
        }
    }

    fn validate_rules(&self, rules: &ValidationRules, value: &Value) -> Result<()> {
        if let Some(n) = to_number(value).filter(|_| self.type_.is_numeric()) {
            if let Some(min) = rules.min.filter(|min| n < *min) {
                return Err(FieldsError::validation(
                    &self.key,
                    format!("must be at least {min}"),
                ));
            }
            if let Some(max) = rules.max.filter(|max| n > *max) {
                return Err(FieldsError::validation(
                    &self.key,
                    format!("must be at most {max}"),
                ));
            }
        }

        let text = to_text(value);
        let len = text.chars().count();
        if let Some(min) = rules.min_length.filter(|min| len < *min) {
            return Err(FieldsError::validation(
                &self.key,
                format!("must be at least {min} characters"),
            ));
        }
        if let Some(max) = rules.max_length.filter(|max| len > *max) {
            return Err(FieldsError::validation(
                &self.key,
                format!("must be at most {max} characters"),
            ));
        }
        if let Some(pattern) = &rules.pattern {
            let re = Regex::new(pattern).map_err(|e| {
                FieldsError::InvalidValidation {
                    key: self.key.clone(),
                    message: format!("bad pattern: {e}"),
                }
            })?;
            if !re.is_match(&text) {
                return Err(FieldsError::validation(
                    &self.key,
                    format!("does not match pattern {pattern}"),
                ));
            }
        }
        Ok(())
    }
}
