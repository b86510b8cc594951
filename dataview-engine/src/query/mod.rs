//! Query pipeline: search → filter → sort → group → paginate.
//!
//! [`evaluate`] is a pure function of its inputs. Every filter, sort and
//! group is validated against the schema before any stage runs, so a bad
//! reference fails the whole evaluation instead of being skipped.

pub mod aggregate;
pub mod filter;
pub mod group;
pub mod paginate;
pub mod search;
pub mod sort;

use dataview_fields::{FieldConfig, FieldSchema, Record};
use dataview_views::{Pagination, ViewState};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Result;

pub use aggregate::{AggregateFn, Aggregation};
pub use group::{Bucket, UNGROUPED};

/// The canonical view of a record set under one `ViewState`.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    /// Buckets on the current page, in display order.
    pub buckets: Vec<Bucket<'a>>,
    /// Every bucket over the whole filtered set.
    pub groups: Vec<Bucket<'a>>,
    /// All filtered records in final order, across every page.
    pub ordered: Vec<&'a Record>,
    pub pagination: Pagination,
}

impl<'a> QueryResult<'a> {
    /// Ids of every record that passed search and filters.
    pub fn visible_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.ordered.iter().map(|r| r.id.clone())
    }

    /// Records on the current page, flattened.
    pub fn page_records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.buckets.iter().flat_map(|b| b.records.iter().copied())
    }

    /// The ordered, filtered list to hand to an exporter. Ignores paging.
    pub fn export_rows(&self) -> &[&'a Record] {
        &self.ordered
    }

    /// [`QueryResult::export_rows`] as a JSON array of flat records.
    pub fn export_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.ordered)?)
    }

    pub fn find(&self, id: &str) -> Option<&'a Record> {
        self.ordered.iter().copied().find(|r| r.id == id)
    }
}

/// Run the full pipeline.
pub fn evaluate<'a>(
    records: &'a [Record],
    schema: &FieldSchema,
    state: &ViewState,
) -> Result<QueryResult<'a>> {
    let filter_fields = state
        .filters
        .iter()
        .map(|f| f.validate(schema))
        .collect::<dataview_views::Result<Vec<&FieldConfig>>>()?;
    let sort_specs = state
        .sorts
        .iter()
        .map(|s| s.validate(schema).map(|field| (field, s.direction)))
        .collect::<dataview_views::Result<Vec<_>>>()?;
    let group = match state.groups.first() {
        Some(config) => Some((config.validate(schema)?, config)),
        None => None,
    };

    let searched = search::apply(records.iter().collect(), schema, &state.search);
    trace!(input = records.len(), matched = searched.len(), "search applied");

    let filtered: Vec<&Record> = searched
        .into_iter()
        .filter(|r| filter::matches_all(r, &filter_fields, &state.filters))
        .collect();
    trace!(filtered = filtered.len(), "filters applied");

    let sorted = sort::apply(filtered, &sort_specs);
    let groups = group::apply(sorted, group);
    let ordered: Vec<&Record> = groups.iter().flat_map(|b| b.records.iter().copied()).collect();
    let (buckets, pagination) = paginate::apply(&groups, state.pagination);

    debug!(
        input = records.len(),
        total = pagination.total,
        buckets = groups.len(),
        page = pagination.page,
        "query evaluated"
    );

    Ok(QueryResult {
        buckets,
        groups,
        ordered,
        pagination,
    })
}
