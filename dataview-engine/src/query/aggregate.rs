//! Aggregations over a record set.

use std::cmp::Ordering;

use dataview_fields::value::{is_empty, to_number};
use dataview_fields::{FieldSchema, FieldsError, Record};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// One metric. `count` without a field counts records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub function: AggregateFn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Aggregation {
    pub fn count() -> Self {
        Self {
            field: None,
            function: AggregateFn::Count,
            label: None,
        }
    }

    pub fn of(function: AggregateFn, field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            function,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Display name: the label, else e.g. "sum of points".
    pub fn name(&self) -> String {
        match (&self.label, &self.field) {
            (Some(label), _) => label.clone(),
            (None, Some(field)) => format!("{} of {field}", self.function.as_str()),
            (None, None) => self.function.as_str().to_string(),
        }
    }

    /// Check the field exists and suits the function.
    ///
    /// `sum`/`avg` need a numeric field, `min`/`max` an ordered one.
    pub fn validate(&self, schema: &FieldSchema) -> Result<()> {
        let Some(key) = &self.field else {
            return match self.function {
                AggregateFn::Count => Ok(()),
                function => Err(EngineError::InvalidAggregation {
                    function: function.as_str().to_string(),
                    message: "needs a field".to_string(),
                }),
            };
        };
        let field = schema.get(key).ok_or_else(|| FieldsError::FieldNotFound {
            key: key.clone(),
        })?;
        let ok = match self.function {
            AggregateFn::Count => true,
            AggregateFn::Sum | AggregateFn::Avg => field.type_.is_numeric(),
            AggregateFn::Min | AggregateFn::Max => field.type_.is_ordered(),
        };
        if ok {
            Ok(())
        } else {
            Err(FieldsError::TypeMismatch {
                key: key.clone(),
                operator: self.function.as_str().to_string(),
                field_type: field.type_.to_string(),
            }
            .into())
        }
    }

    /// Evaluate over `records`. Call [`Aggregation::validate`] first.
    ///
    /// Returns `null` for avg/min/max over no values.
    pub fn evaluate(&self, records: &[&Record], schema: &FieldSchema) -> Value {
        let field = self.field.as_deref().and_then(|k| schema.get(k));
        let Some(field) = field else {
            return json!(records.len());
        };
        let values = records
            .iter()
            .filter_map(|r| r.get(&field.key))
            .filter(|v| !is_empty(Some(*v)));

        match self.function {
            AggregateFn::Count => json!(values.count()),
            AggregateFn::Sum => json!(values.filter_map(to_number).sum::<f64>()),
            AggregateFn::Avg => {
                let numbers: Vec<f64> = values.filter_map(to_number).collect();
                if numbers.is_empty() {
                    Value::Null
                } else {
                    json!(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            AggregateFn::Min | AggregateFn::Max => {
                let wanted = if self.function == AggregateFn::Min {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
                values
                    .fold(None::<&Value>, |best, v| match best {
                        Some(b) if field.compare_values(v, b) != Some(wanted) => Some(b),
                        _ if field.compare_values(v, v).is_none() => best,
                        _ => Some(v),
                    })
                    .cloned()
                    .unwrap_or(Value::Null)
            }
        }
    }
}
