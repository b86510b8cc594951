//! Multi-key stable sort.

use std::cmp::Ordering;

use dataview_fields::{FieldConfig, Record, SortKey};
use dataview_views::SortDirection;

/// One resolved sort key: the field and its direction.
pub type SortSpec<'s> = (&'s FieldConfig, SortDirection);

/// Sort records by `specs` in priority order.
///
/// The sort is stable, so records with equal keys keep their input order.
/// Empty or uncoercible values sort last in either direction.
pub fn apply<'a>(records: Vec<&'a Record>, specs: &[SortSpec<'_>]) -> Vec<&'a Record> {
    if specs.is_empty() {
        return records;
    }

    let mut keyed: Vec<(Vec<Option<SortKey>>, &'a Record)> = records
        .into_iter()
        .map(|record| {
            let keys = specs
                .iter()
                .map(|(field, _)| field.sort_key(record.get(&field.key)))
                .collect();
            (keys, record)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, specs));
    keyed.into_iter().map(|(_, record)| record).collect()
}

fn compare_keys(a: &[Option<SortKey>], b: &[Option<SortKey>], specs: &[SortSpec<'_>]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(specs)
        .map(|((a, b), (_, direction))| compare_one(a.as_ref(), b.as_ref(), *direction))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Compare two keys; `None` is always greater so it lands last.
pub(crate) fn compare_one(
    a: Option<&SortKey>,
    b: Option<&SortKey>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        },
    }
}
