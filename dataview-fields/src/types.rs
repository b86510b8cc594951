//! Core field configuration types.
//!
//! All types serialize to/from YAML or JSON via serde. A `FieldConfig`
//! describes one named, typed attribute of a record together with the
//! capabilities (sort/filter/group/search) a view may use it for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::FilterOperator;

/// A single option in a select or multi-select field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, order: i32) -> Self {
        Self {
            value: value.into(),
            label: None,
            color: None,
            order,
        }
    }

    /// Label shown to users, falling back to the raw value.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// Value shape of a field; drives coercion, comparison and display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Datetime,
    Select,
    Multiselect,
    Currency,
    Percentage,
    Url,
    Email,
    Relation,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Url => "url",
            Self::Email => "email",
            Self::Relation => "relation",
        }
    }

    /// Types whose values carry `options`.
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }

    /// Types compared numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Currency | Self::Percentage)
    }

    /// Types compared as points in time.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }

    /// Types with a total order usable by `gt`/`lt`/`between`.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Whether `op` is meaningful for values of this type.
    pub fn supports(&self, op: FilterOperator) -> bool {
        if op.is_ordered() {
            return self.is_ordered();
        }
        if op.is_textual() {
            return *self != Self::Boolean;
        }
        true
    }

    fn default_searchable(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Url | Self::Email | Self::Select | Self::Multiselect
        )
    }

    fn default_groupable(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::Multiselect | Self::Boolean | Self::Relation
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role lists gating who may read or write a field. Empty means unrestricted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldSecurity {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub write_roles: Vec<String>,
}

impl FieldSecurity {
    pub fn can_read<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        allowed(&self.read_roles, roles)
    }

    pub fn can_write<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        allowed(&self.write_roles, roles)
    }
}

fn allowed<S: AsRef<str>>(required: &[String], roles: &[S]) -> bool {
    required.is_empty()
        || roles
            .iter()
            .any(|r| required.iter().any(|req| req == r.as_ref()))
}

/// Constraints checked by `FieldConfig::validate_value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// How a value is turned into display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldFormat {
    Currency {
        code: String,
        #[serde(default = "default_decimals")]
        decimals: usize,
    },
    Percentage {
        #[serde(default)]
        decimals: usize,
    },
    Number {
        #[serde(default)]
        decimals: usize,
    },
    /// chrono strftime pattern, e.g. `%b %d, %Y`
    Date { pattern: String },
    Boolean {
        true_label: String,
        false_label: String,
    },
}

fn default_decimals() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Configuration of one named, typed attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldConfig {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<FieldSecurity>,
}

impl FieldConfig {
    /// Create a field with default capabilities for its type.
    pub fn new(key: impl Into<String>, label: impl Into<String>, type_: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            type_,
            required: false,
            readonly: false,
            visible: true,
            sortable: true,
            filterable: true,
            groupable: None,
            searchable: None,
            width: None,
            options: None,
            validation: None,
            format: None,
            security: None,
        }
    }

    /// Shorthand for a select field with options ordered as given.
    pub fn select<I, S>(key: impl Into<String>, label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| SelectOption::new(v, i as i32))
            .collect();
        Self::new(key, label, FieldType::Select).with_options(options)
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_security(mut self, security: FieldSecurity) -> Self {
        self.security = Some(security);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn sortable(mut self, on: bool) -> Self {
        self.sortable = on;
        self
    }

    pub fn filterable(mut self, on: bool) -> Self {
        self.filterable = on;
        self
    }

    pub fn groupable(mut self, on: bool) -> Self {
        self.groupable = Some(on);
        self
    }

    pub fn searchable(mut self, on: bool) -> Self {
        self.searchable = Some(on);
        self
    }

    /// Infer searchability from the field type if not explicitly set.
    pub fn effective_searchable(&self) -> bool {
        self.searchable
            .unwrap_or_else(|| self.type_.default_searchable())
    }

    /// Infer groupability from the field type if not explicitly set.
    pub fn effective_groupable(&self) -> bool {
        self.groupable.unwrap_or_else(|| self.type_.default_groupable())
    }

    /// Find a declared option by its value.
    pub fn option(&self, value: &str) -> Option<&SelectOption> {
        self.options
            .as_deref()
            .and_then(|opts| opts.iter().find(|o| o.value == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn field_type_yaml_round_trip() {
        let yaml = serde_yaml_ng::to_string(&FieldType::Multiselect).unwrap();
        assert_eq!(yaml.trim(), "multiselect");
        let parsed: FieldType = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, FieldType::Multiselect);
    }

    #[rstest]
    #[case(FieldType::Number, FilterOperator::Gt, true)]
    #[case(FieldType::Date, FilterOperator::Between, true)]
    #[case(FieldType::Percentage, FilterOperator::Lte, true)]
    #[case(FieldType::Datetime, FilterOperator::Gte, true)]
    #[case(FieldType::Text, FilterOperator::Gt, false)]
    #[case(FieldType::Select, FilterOperator::Between, false)]
    #[case(FieldType::Boolean, FilterOperator::Contains, false)]
    #[case(FieldType::Boolean, FilterOperator::Equals, true)]
    #[case(FieldType::Number, FilterOperator::StartsWith, true)]
    #[case(FieldType::Multiselect, FilterOperator::In, true)]
    #[case(FieldType::Email, FilterOperator::IsEmpty, true)]
    fn operator_support(
        #[case] field_type: FieldType,
        #[case] op: FilterOperator,
        #[case] expected: bool,
    ) {
        assert_eq!(field_type.supports(op), expected);
    }

    #[test]
    fn capability_defaults_follow_type() {
        let title = FieldConfig::new("title", "Title", FieldType::Text);
        assert!(title.effective_searchable());
        assert!(!title.effective_groupable());
        assert!(title.sortable && title.filterable && title.visible);

        let status = FieldConfig::select("status", "Status", ["Todo", "Done"]);
        assert!(status.effective_groupable());
        assert_eq!(status.option("Done").map(|o| o.order), Some(1));

        let budget = FieldConfig::new("budget", "Budget", FieldType::Currency).searchable(true);
        assert!(budget.effective_searchable());
    }

    #[test]
    fn field_config_from_yaml_applies_defaults() {
        let yaml_input = r#"
key: status
label: Status
type: select
groupable: true
options:
  - value: Backlog
    color: gray
    order: 0
  - value: Done
    color: green
    order: 4
security:
  write_roles: [admin]
"#;
        let field: FieldConfig = serde_yaml_ng::from_str(yaml_input).unwrap();
        assert_eq!(field.type_, FieldType::Select);
        assert!(field.visible);
        assert!(field.sortable);
        assert!(!field.required);
        assert_eq!(field.options.as_ref().map(Vec::len), Some(2));
        let security = field.security.as_ref().unwrap();
        assert!(security.can_read(&["viewer"]));
        assert!(!security.can_write(&["viewer"]));
        assert!(security.can_write(&["viewer", "admin"]));
    }

    #[test]
    fn field_format_is_tagged_by_kind() {
        let format = FieldFormat::Currency {
            code: "EUR".into(),
            decimals: 2,
        };
        let json = serde_json::to_value(&format).unwrap();
        assert_eq!(json["kind"], "currency");
        let parsed: FieldFormat =
            serde_json::from_str(r#"{"kind":"currency","code":"USD"}"#).unwrap();
        assert_eq!(
            parsed,
            FieldFormat::Currency {
                code: "USD".into(),
                decimals: 2
            }
        );
    }
}
