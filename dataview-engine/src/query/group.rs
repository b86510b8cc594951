//! Grouping into buckets.

use std::cmp::Ordering;

use dataview_fields::{FieldConfig, Record, SortKey};
use dataview_views::{GroupConfig, SortDirection};
use indexmap::IndexMap;
use serde::Serialize;

use super::sort::compare_one;

/// Key of the bucket that collects records with no group value.
pub const UNGROUPED: &str = "Ungrouped";

/// A named run of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<'a> {
    pub key: String,
    pub records: Vec<&'a Record>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
}

impl<'a> Bucket<'a> {
    pub fn new(key: impl Into<String>, records: Vec<&'a Record>) -> Self {
        Self {
            key: key.into(),
            records,
            collapsed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Bucket sorted records by the display value of the group field.
///
/// Without a group, all records land in one bucket keyed `""`. Bucket order
/// is first appearance unless the group declares a direction, in which case
/// buckets are ordered by the field's own ordering with `Ungrouped` last.
pub fn apply<'a>(records: Vec<&'a Record>, group: Option<(&FieldConfig, &GroupConfig)>) -> Vec<Bucket<'a>> {
    let Some((field, config)) = group else {
        return vec![Bucket::new("", records)];
    };

    // `None` collects records with no group value, apart from any real
    // value that happens to read "Ungrouped".
    let mut buckets: IndexMap<Option<String>, Vec<&'a Record>> = IndexMap::new();
    for record in records {
        let label = field.display_value(record.get(&field.key));
        let key = (!label.is_empty()).then_some(label);
        buckets.entry(key).or_default().push(record);
    }

    if let Some(direction) = config.direction {
        buckets.sort_by(|ka, ra, kb, rb| {
            let a = bucket_sort_key(field, ra);
            let b = bucket_sort_key(field, rb);
            match (ka, kb) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(ka), Some(kb)) => {
                    compare_one(a.as_ref(), b.as_ref(), direction).then_with(|| match direction {
                        SortDirection::Asc => ka.cmp(kb),
                        SortDirection::Desc => kb.cmp(ka),
                    })
                }
            }
        });
    }

    buckets
        .into_iter()
        .map(|(key, records)| Bucket {
            key: key.unwrap_or_else(|| UNGROUPED.to_string()),
            records,
            collapsed: config.collapsed,
        })
        .collect()
}

fn bucket_sort_key(field: &FieldConfig, records: &[&Record]) -> Option<SortKey> {
    records
        .first()
        .and_then(|r| field.sort_key(r.get(&field.key)))
}
