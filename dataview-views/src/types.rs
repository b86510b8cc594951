//! View state types: view type, filters, sorts, groups, pagination.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use dataview_fields::{Capability, FieldConfig, FieldSchema, FilterOperator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ViewError};

/// Page size used when a view does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Every way a record set can be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
    #[default]
    Grid,
    Kanban,
    Gantt,
    Calendar,
    Card,
    List,
    Form,
    Detail,
    Dashboard,
    Asset,
    Map,
    Workload,
}

impl ViewType {
    pub const ALL: [ViewType; 12] = [
        Self::Grid,
        Self::Kanban,
        Self::Gantt,
        Self::Calendar,
        Self::Card,
        Self::List,
        Self::Form,
        Self::Detail,
        Self::Dashboard,
        Self::Asset,
        Self::Map,
        Self::Workload,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Kanban => "kanban",
            Self::Gantt => "gantt",
            Self::Calendar => "calendar",
            Self::Card => "card",
            Self::List => "list",
            Self::Form => "form",
            Self::Detail => "detail",
            Self::Dashboard => "dashboard",
            Self::Asset => "asset",
            Self::Map => "map",
            Self::Workload => "workload",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown view type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One active filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Value,
}

impl FilterConfig {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Build from an operator name as it arrives from a UI or saved view.
    pub fn parse(
        field: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let operator = operator.parse::<FilterOperator>()?;
        Ok(Self::new(field, operator, value))
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equals, value)
    }

    pub fn is_empty(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsEmpty, Value::Null)
    }

    /// Check the filter against a schema: the field must be filterable, the
    /// operator valid for its type, and the value shaped for the operator.
    pub fn validate<'s>(&self, schema: &'s FieldSchema) -> Result<&'s FieldConfig> {
        let field = schema.check_operator(&self.field, self.operator)?;
        let op = self.operator;

        if op.is_unary() {
            return Ok(field);
        }

        match (&self.value, op) {
            (Value::Array(items), FilterOperator::Between) => {
                let [low, high] = items.as_slice() else {
                    return Err(ViewError::invalid_filter(
                        &self.field,
                        "between requires exactly two bounds",
                    ));
                };
                if field.compare_values(low, high).is_none() {
                    return Err(ViewError::invalid_filter(
                        &self.field,
                        format!("bounds do not coerce to {}", field.type_),
                    ));
                }
            }
            (Value::Array(_), FilterOperator::In | FilterOperator::NotIn) => {}
            (_, FilterOperator::Between | FilterOperator::In | FilterOperator::NotIn) => {
                return Err(ViewError::invalid_filter(
                    &self.field,
                    format!("{op} requires a list value"),
                ));
            }
            (value, op) if op.is_ordered() => {
                if field.compare_values(value, value).is_none() {
                    return Err(ViewError::invalid_filter(
                        &self.field,
                        format!("'{value}' does not coerce to {}", field.type_),
                    ));
                }
            }
            _ => {}
        }
        Ok(field)
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn validate<'s>(&self, schema: &'s FieldSchema) -> Result<&'s FieldConfig> {
        Ok(schema.require(&self.field, Capability::Sort)?)
    }
}

/// One grouping level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub field: String,
    /// When set, buckets are ordered by key; otherwise by first appearance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    #[serde(default)]
    pub collapsed: bool,
}

impl GroupConfig {
    pub fn by(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: None,
            collapsed: false,
        }
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn validate<'s>(&self, schema: &'s FieldSchema) -> Result<&'s FieldConfig> {
        Ok(schema.require(&self.field, Capability::Group)?)
    }
}

/// Page window over the filtered record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    /// Number of pages; at least 1 even when there are no records.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Clamp a requested page into `[1, page_count]`.
    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.page_count())
    }

    /// Index of the first record on the current page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.page_size
    }

    /// Same window with a new total; the page is re-clamped.
    pub fn with_total(self, total: usize) -> Self {
        let mut next = Self { total, ..self };
        next.page = next.clamp_page(self.page);
        next
    }
}

/// Complete description of one view instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(rename = "type", default)]
    pub view_type: ViewType,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    #[serde(default)]
    pub sorts: Vec<SortConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub selected_ids: BTreeSet<String>,
}

impl ViewState {
    pub fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            ..Default::default()
        }
    }

    pub fn filter_for(&self, field: &str) -> Option<&FilterConfig> {
        self.filters.iter().find(|f| f.field == field)
    }

    pub fn sort_for(&self, field: &str) -> Option<&SortConfig> {
        self.sorts.iter().find(|s| s.field == field)
    }

    /// Validate every filter, sort and group against a schema.
    pub fn validate(&self, schema: &FieldSchema) -> Result<()> {
        for filter in &self.filters {
            filter.validate(schema)?;
        }
        for sort in &self.sorts {
            sort.validate(schema)?;
        }
        for group in &self.groups {
            group.validate(schema)?;
        }
        if self.pagination.page_size == 0 {
            return Err(ViewError::InvalidPageSize);
        }
        Ok(())
    }
}

/// Collapse duplicate field references, last write wins, first slot kept.
pub(crate) fn upsert_by_field<T, F>(items: &mut Vec<T>, item: T, field_of: F)
where
    F: Fn(&T) -> &str,
{
    match items.iter().position(|i| field_of(i) == field_of(&item)) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_fields::{FieldType, FieldsError};
    use serde_json::json;

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldConfig::new("title", "Title", FieldType::Text),
            FieldConfig::new("points", "Points", FieldType::Number),
            FieldConfig::new("due", "Due", FieldType::Date),
            FieldConfig::select("status", "Status", ["Todo", "Done"]),
        ])
        .unwrap()
    }

    #[test]
    fn view_type_round_trips_through_strings() {
        for t in ViewType::ALL {
            assert_eq!(t.as_str().parse::<ViewType>().unwrap(), t);
        }
        assert!("spreadsheet".parse::<ViewType>().is_err());
        assert_eq!(serde_json::to_string(&ViewType::Gantt).unwrap(), "\"gantt\"");
    }

    #[test]
    fn pagination_clamps() {
        let p = Pagination::new(10).with_total(0);
        assert_eq!(p.page_count(), 1);
        assert_eq!(p.clamp_page(5), 1);

        let p = Pagination::new(10).with_total(25);
        assert_eq!(p.page_count(), 3);
        assert_eq!(p.clamp_page(0), 1);
        assert_eq!(p.clamp_page(7), 3);

        let p = Pagination {
            page: 3,
            page_size: 10,
            total: 25,
        };
        assert_eq!(p.offset(), 20);
        assert_eq!(p.with_total(12).page, 2);
    }

    #[test]
    fn filter_validation_checks_value_shape() {
        let schema = schema();
        let between = FilterConfig::new("points", FilterOperator::Between, json!([1, 5]));
        assert!(between.validate(&schema).is_ok());

        let bad = FilterConfig::new("points", FilterOperator::Between, json!([1]));
        assert!(matches!(
            bad.validate(&schema),
            Err(ViewError::InvalidFilterValue { .. })
        ));

        let not_list = FilterConfig::new("status", FilterOperator::In, json!("Todo"));
        assert!(not_list.validate(&schema).is_err());

        let bad_date = FilterConfig::new("due", FilterOperator::Gt, json!("soon"));
        assert!(bad_date.validate(&schema).is_err());

        let empty = FilterConfig::is_empty("title");
        assert!(empty.validate(&schema).is_ok());
    }

    #[test]
    fn filter_validation_rejects_type_mismatch() {
        let schema = schema();
        let err = FilterConfig::new("title", FilterOperator::Gt, json!("m"))
            .validate(&schema)
            .unwrap_err();
        assert!(matches!(
            err,
            ViewError::Field(FieldsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn parse_rejects_unknown_operator() {
        let err = FilterConfig::parse("title", "regex", json!(".*")).unwrap_err();
        assert!(matches!(
            err,
            ViewError::Field(FieldsError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn view_state_serializes_with_type_key() {
        let mut state = ViewState::new(ViewType::Kanban);
        state.sorts.push(SortConfig::desc("points"));
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["type"], "kanban");
        assert_eq!(value["sorts"][0]["direction"], "desc");
        let parsed: ViewState = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn upsert_keeps_first_slot() {
        let mut sorts = vec![SortConfig::asc("a"), SortConfig::asc("b")];
        upsert_by_field(&mut sorts, SortConfig::desc("a"), |s| s.field.as_str());
        assert_eq!(sorts, vec![SortConfig::desc("a"), SortConfig::asc("b")]);
        upsert_by_field(&mut sorts, SortConfig::asc("c"), |s| s.field.as_str());
        assert_eq!(sorts.len(), 3);
    }
}
