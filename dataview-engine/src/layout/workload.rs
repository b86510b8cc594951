//! Resource workload: effort assigned per resource against its capacity.

use dataview_fields::value::{is_empty, to_number, to_text};
use dataview_fields::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// A resource that records can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub capacity: f64,
}

impl Resource {
    pub fn new(id: impl Into<String>, capacity: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            capacity,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadOptions {
    /// Field naming the resource(s); a list assigns the record to each.
    pub resource_field: String,
    /// Numeric effort field. Without one every assignment weighs 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_field: Option<String>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceLoad {
    pub id: String,
    pub name: String,
    pub capacity: f64,
    pub effort: f64,
    /// Effort as a percentage of capacity.
    pub utilization: f64,
    pub over_allocated: bool,
    pub record_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workload {
    pub resources: Vec<ResourceLoad>,
    /// Records that name no known resource.
    pub unassigned: Vec<String>,
}

impl Workload {
    pub fn resource(&self, id: &str) -> Option<&ResourceLoad> {
        self.resources.iter().find(|r| r.id == id)
    }
}

/// Utilization in percent. Zero capacity with any effort is unbounded.
pub fn utilization(effort: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        effort / capacity * 100.0
    } else if effort > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Sum effort per resource over `records`.
pub fn layout(records: &[&Record], options: &WorkloadOptions) -> Workload {
    let mut loads: IndexMap<&str, (f64, Vec<String>)> = options
        .resources
        .iter()
        .map(|r| (r.id.as_str(), (0.0, Vec::new())))
        .collect();
    let mut unassigned = Vec::new();

    for record in records {
        let effort = match &options.effort_field {
            Some(field) => record.get(field).and_then(to_number).unwrap_or(0.0),
            None => 1.0,
        };

        let mut assigned = false;
        for name in resource_names(record.get(&options.resource_field)) {
            if let Some((total, ids)) = loads.get_mut(name.as_str()) {
                *total += effort;
                ids.push(record.id.clone());
                assigned = true;
            }
        }
        if !assigned {
            unassigned.push(record.id.clone());
        }
    }

    let resources = options
        .resources
        .iter()
        .map(|resource| {
            let (effort, record_ids) = loads
                .swap_remove(resource.id.as_str())
                .unwrap_or_default();
            let utilization = utilization(effort, resource.capacity);
            ResourceLoad {
                id: resource.id.clone(),
                name: resource.display_name().to_string(),
                capacity: resource.capacity,
                effort,
                utilization,
                over_allocated: utilization > 100.0,
                record_ids,
            }
        })
        .collect();

    trace!(
        resources = options.resources.len(),
        unassigned = unassigned.len(),
        "workload laid out"
    );
    Workload {
        resources,
        unassigned,
    }
}

fn resource_names(value: Option<&Value>) -> Vec<String> {
    if is_empty(value) {
        return Vec::new();
    }
    match value {
        Some(Value::Array(items)) => items.iter().map(to_text).collect(),
        Some(other) => vec![to_text(other)],
        None => Vec::new(),
    }
}
