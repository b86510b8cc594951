//! The validated set of fields a view operates on.
//!
//! A schema is an ordered, validated list of `FieldConfig` with an in-memory
//! index by key. It is built once per evaluation from caller-supplied
//! configs and never mutated afterwards.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::operator::{Capability, FilterOperator};
use crate::types::FieldConfig;

/// A validated collection of field configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    fields: Vec<FieldConfig>,
    key_index: HashMap<String, usize>,
}

impl FieldSchema {
    /// Validate and index a list of field configs.
    ///
    /// Fails on duplicate or empty keys, options declared on a non-enumerable
    /// type, select types without options, duplicate option values, and
    /// validation rules that can never hold.
    pub fn new(fields: Vec<FieldConfig>) -> Result<Self> {
        let mut key_index = HashMap::with_capacity(fields.len());

        for (idx, field) in fields.iter().enumerate() {
            check_field(field)?;
            if key_index.insert(field.key.clone(), idx).is_some() {
                return Err(FieldsError::DuplicateKey {
                    key: field.key.clone(),
                });
            }
        }

        debug!(fields = fields.len(), "field schema built");
        Ok(Self { fields, key_index })
    }

    /// Build from any iterator of configs, e.g. one deserialized from YAML.
    pub fn from_configs<I>(configs: I) -> Result<Self>
    where
        I: IntoIterator<Item = FieldConfig>,
    {
        Self::new(configs.into_iter().collect())
    }

    // --- Lookup ---

    /// Get a field by key.
    pub fn get(&self, key: &str) -> Option<&FieldConfig> {
        self.key_index.get(key).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.key_index.contains_key(key)
    }

    /// All fields, in declaration order.
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields the search box looks at.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.iter().filter(|f| f.effective_searchable())
    }

    /// Fields shown by default (table columns, card rows, form inputs).
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.iter().filter(|f| f.visible)
    }

    /// Look up a field and require that it grants `capability`.
    pub fn require(&self, key: &str, capability: Capability) -> Result<&FieldConfig> {
        let field = self.get(key).ok_or_else(|| FieldsError::FieldNotFound {
            key: key.to_string(),
        })?;
        let granted = match capability {
            Capability::Sort => field.sortable,
            Capability::Filter => field.filterable,
            Capability::Group => field.effective_groupable(),
            Capability::Search => field.effective_searchable(),
        };
        if granted {
            Ok(field)
        } else {
            Err(FieldsError::MissingCapability {
                key: key.to_string(),
                capability: capability.as_str().to_string(),
            })
        }
    }

    /// Require a filterable field whose type admits `op`.
    pub fn check_operator(&self, key: &str, op: FilterOperator) -> Result<&FieldConfig> {
        let field = self.require(key, Capability::Filter)?;
        if field.type_.supports(op) {
            Ok(field)
        } else {
            Err(FieldsError::TypeMismatch {
                key: key.to_string(),
                operator: op.to_string(),
                field_type: field.type_.to_string(),
            })
        }
    }

    // --- Security ---

    /// The subset of fields readable by any of `roles`, as a new schema.
    pub fn readable_by<S: AsRef<str>>(&self, roles: &[S]) -> FieldSchema {
        let fields: Vec<FieldConfig> = self
            .fields
            .iter()
            .filter(|f| f.security.as_ref().is_none_or(|s| s.can_read(roles)))
            .cloned()
            .collect();
        let key_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.key.clone(), i))
            .collect();
        FieldSchema { fields, key_index }
    }

    /// Whether `roles` may edit `key`. Readonly fields are never writable.
    pub fn writable_by<S: AsRef<str>>(&self, key: &str, roles: &[S]) -> Result<bool> {
        let field = self.get(key).ok_or_else(|| FieldsError::FieldNotFound {
            key: key.to_string(),
        })?;
        Ok(!field.readonly && field.security.as_ref().is_none_or(|s| s.can_write(roles)))
    }
}

fn check_field(field: &FieldConfig) -> Result<()> {
    if field.key.trim().is_empty() {
        return Err(FieldsError::EmptyKey);
    }

    match (&field.options, field.type_.is_enumerable()) {
        (Some(_), false) => {
            return Err(FieldsError::UnexpectedOptions {
                key: field.key.clone(),
                field_type: field.type_.to_string(),
            })
        }
        (None, true) => {
            return Err(FieldsError::MissingOptions {
                key: field.key.clone(),
                field_type: field.type_.to_string(),
            })
        }
        (Some(options), true) => {
            let mut seen = HashSet::new();
            for option in options {
                if !seen.insert(option.value.as_str()) {
                    return Err(FieldsError::DuplicateOption {
                        key: field.key.clone(),
                        value: option.value.clone(),
                    });
                }
            }
        }
        (None, false) => {}
    }

    if let Some(rules) = &field.validation {
        rules.check(&field.key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldSecurity, FieldType, SelectOption, ValidationRules};

    fn task_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::new("title", "Title", FieldType::Text).required(),
            FieldConfig::select("status", "Status", ["Todo", "Doing", "Done"]),
            FieldConfig::new("points", "Points", FieldType::Number),
            FieldConfig::new("notes", "Notes", FieldType::Text)
                .filterable(false)
                .sortable(false),
            FieldConfig::new("salary", "Salary", FieldType::Currency).with_security(
                FieldSecurity {
                    read_roles: vec!["hr".into()],
                    write_roles: vec!["hr".into()],
                },
            ),
        ]
    }

    #[test]
    fn lookup_by_key() {
        let schema = FieldSchema::new(task_fields()).unwrap();
        assert_eq!(schema.len(), 5);
        assert_eq!(schema.get("status").unwrap().label, "Status");
        assert!(schema.get("missing").is_none());
        assert!(schema.contains("points"));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut fields = task_fields();
        fields.push(FieldConfig::new("title", "Again", FieldType::Text));
        let err = FieldSchema::new(fields).unwrap_err();
        assert_eq!(
            err,
            FieldsError::DuplicateKey {
                key: "title".into()
            }
        );
        assert!(err.is_schema_error());
    }

    #[test]
    fn options_only_on_enumerable_types() {
        let bad = FieldConfig::new("points", "Points", FieldType::Number)
            .with_options(vec![SelectOption::new("1", 0)]);
        assert!(matches!(
            FieldSchema::new(vec![bad]),
            Err(FieldsError::UnexpectedOptions { .. })
        ));

        let missing = FieldConfig::new("status", "Status", FieldType::Select);
        assert!(matches!(
            FieldSchema::new(vec![missing]),
            Err(FieldsError::MissingOptions { .. })
        ));

        let dupe = FieldConfig::select("status", "Status", ["Todo", "Todo"]);
        assert!(matches!(
            FieldSchema::new(vec![dupe]),
            Err(FieldsError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn empty_key_and_bad_rules() {
        let blank = FieldConfig::new("  ", "Blank", FieldType::Text);
        assert_eq!(FieldSchema::new(vec![blank]), Err(FieldsError::EmptyKey));

        let bad_rules = FieldConfig::new("n", "N", FieldType::Number).with_validation(
            ValidationRules {
                min_length: Some(5),
                max_length: Some(2),
                ..Default::default()
            },
        );
        assert!(FieldSchema::new(vec![bad_rules])
            .unwrap_err()
            .is_schema_error());
    }

    #[test]
    fn require_checks_capability() {
        let schema = FieldSchema::new(task_fields()).unwrap();
        assert!(schema.require("points", Capability::Sort).is_ok());
        assert!(schema.require("status", Capability::Group).is_ok());

        let err = schema.require("notes", Capability::Filter).unwrap_err();
        assert!(err.is_invalid_field());
        let err = schema.require("points", Capability::Group).unwrap_err();
        assert_eq!(err.to_string(), "field 'points' is not groupable");
        assert!(matches!(
            schema.require("nope", Capability::Sort),
            Err(FieldsError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn check_operator_enforces_type() {
        let schema = FieldSchema::new(task_fields()).unwrap();
        assert!(schema.check_operator("points", FilterOperator::Gt).is_ok());
        let err = schema
            .check_operator("title", FilterOperator::Gt)
            .unwrap_err();
        assert_eq!(
            err,
            FieldsError::TypeMismatch {
                key: "title".into(),
                operator: "gt".into(),
                field_type: "text".into(),
            }
        );
    }

    #[test]
    fn security_restricts_fields() {
        let schema = FieldSchema::new(task_fields()).unwrap();
        let viewer = schema.readable_by(&["viewer"]);
        assert_eq!(viewer.len(), 4);
        assert!(viewer.get("salary").is_none());
        assert!(viewer.get("points").is_some());

        let hr = schema.readable_by(&["hr"]);
        assert!(hr.get("salary").is_some());

        assert!(!schema.writable_by("salary", &["viewer"]).unwrap());
        assert!(schema.writable_by("salary", &["hr"]).unwrap());
    }

    #[test]
    fn searchable_and_visible_iterators() {
        let mut fields = task_fields();
        fields.push(FieldConfig::new("internal", "Internal", FieldType::Text).hidden());
        let schema = FieldSchema::new(fields).unwrap();
        let searchable: Vec<_> = schema.searchable_fields().map(|f| f.key.as_str()).collect();
        assert_eq!(searchable, vec!["title", "status", "notes", "internal"]);
        assert_eq!(schema.visible_fields().count(), 5);
    }
}
