//! Kanban board assignment and the reassign operation.

use dataview_fields::value::to_text;
use dataview_fields::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{EngineError, Result};

/// A board column. Records whose discriminator equals `value` land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub id: String,
    pub name: String,
    /// Discriminator value; defaults to the column id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<usize>,
}

impl KanbanColumn {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: None,
            wip_limit: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_wip_limit(mut self, limit: usize) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanOptions {
    /// The discriminator field.
    pub field: String,
    pub columns: Vec<KanbanColumn>,
}

impl KanbanOptions {
    pub fn find_column(&self, id: &str) -> Option<&KanbanColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn column_for(&self, record: &Record) -> Option<usize> {
        let value = record.get(&self.field).map(to_text)?;
        self.columns.iter().position(|c| c.value() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn<'a> {
    pub id: String,
    pub name: String,
    pub records: Vec<&'a Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<usize>,
    pub over_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanBoard<'a> {
    pub field: String,
    pub columns: Vec<BoardColumn<'a>>,
    /// Records whose discriminator matches no column. Not shown, not deleted.
    pub hidden: Vec<String>,
}

impl<'a> KanbanBoard<'a> {
    pub fn column(&self, id: &str) -> Option<&BoardColumn<'a>> {
        self.columns.iter().find(|c| c.id == id)
    }
}

/// Partition `records` into the configured columns, keeping input order.
pub fn layout<'a>(records: &[&'a Record], options: &KanbanOptions) -> KanbanBoard<'a> {
    let mut buckets: Vec<Vec<&'a Record>> = vec![Vec::new(); options.columns.len()];
    let mut hidden = Vec::new();

    for &record in records {
        match options.column_for(record) {
            Some(idx) => buckets[idx].push(record),
            None => hidden.push(record.id.clone()),
        }
    }

    let columns = options
        .columns
        .iter()
        .zip(buckets)
        .map(|(column, records)| BoardColumn {
            id: column.id.clone(),
            name: column.name.clone(),
            over_limit: column.wip_limit.is_some_and(|limit| records.len() > limit),
            wip_limit: column.wip_limit,
            records,
        })
        .collect();

    trace!(columns = options.columns.len(), hidden = hidden.len(), "kanban laid out");
    KanbanBoard {
        field: options.field.clone(),
        columns,
        hidden,
    }
}

/// Move one record to another column by rewriting its discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reassign {
    pub record_id: String,
    pub column_id: String,
}

impl Reassign {
    pub fn new(record_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            column_id: column_id.into(),
        }
    }

    /// Apply to `records`, returning the previous discriminator value.
    ///
    /// Only the target record is touched; record order is unchanged. WIP
    /// limits are never enforced here.
    pub fn apply(&self, records: &mut [Record], options: &KanbanOptions) -> Result<Option<Value>> {
        let record = records
            .iter_mut()
            .find(|r| r.id == self.record_id)
            .ok_or_else(|| EngineError::RecordNotFound {
                id: self.record_id.clone(),
            })?;
        let column = options
            .find_column(&self.column_id)
            .ok_or_else(|| EngineError::ColumnNotFound {
                id: self.column_id.clone(),
            })?;

        let previous = record.set(options.field.clone(), column.value());
        debug!(
            record = %self.record_id,
            column = %self.column_id,
            "record reassigned"
        );
        Ok(previous)
    }
}
