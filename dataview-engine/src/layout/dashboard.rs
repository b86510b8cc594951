//! Dashboard metrics over the filtered record set.

use dataview_fields::FieldSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::query::{AggregateFn, Aggregation, QueryResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardOptions {
    #[serde(default)]
    pub metrics: Vec<Aggregation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketValue {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub function: AggregateFn,
    pub value: Value,
    /// Per group bucket; a single entry keyed `""` when ungrouped.
    pub by_bucket: Vec<BucketValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total: usize,
    pub metrics: Vec<Metric>,
}

/// Evaluate every metric over the whole filtered set, ignoring paging.
pub fn layout(result: &QueryResult<'_>, options: &DashboardOptions, schema: &FieldSchema) -> Result<Dashboard> {
    for metric in &options.metrics {
        metric.validate(schema)?;
    }

    let metrics = options
        .metrics
        .iter()
        .map(|metric| Metric {
            name: metric.name(),
            function: metric.function,
            value: metric.evaluate(&result.ordered, schema),
            by_bucket: result
                .groups
                .iter()
                .map(|bucket| BucketValue {
                    key: bucket.key.clone(),
                    value: metric.evaluate(&bucket.records, schema),
                })
                .collect(),
        })
        .collect();

    Ok(Dashboard {
        total: result.pagination.total,
        metrics,
    })
}
