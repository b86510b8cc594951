//! Filter evaluation.
//!
//! Filters are validated by the caller before any of them runs; here an
//! operand that fails to coerce simply does not match.

use std::cmp::Ordering;

use dataview_fields::value::{is_empty, to_text};
use dataview_fields::{FieldConfig, FilterOperator, Record};
use dataview_views::FilterConfig;
use serde_json::Value;

/// Evaluate one filter against one record.
pub fn matches(record: &Record, field: &FieldConfig, filter: &FilterConfig) -> bool {
    let actual = record.get(&field.key);
    let expected = &filter.value;

    match filter.operator {
        FilterOperator::IsEmpty => is_empty(actual),
        FilterOperator::IsNotEmpty => !is_empty(actual),
        FilterOperator::Equals => equals(field, actual, expected),
        FilterOperator::NotEquals => !equals(field, actual, expected),
        FilterOperator::Contains => text_test(actual, expected, |a, e| a.contains(e)),
        FilterOperator::StartsWith => text_test(actual, expected, |a, e| a.starts_with(e)),
        FilterOperator::EndsWith => text_test(actual, expected, |a, e| a.ends_with(e)),
        FilterOperator::Gt => compare(field, actual, expected, Ordering::is_gt),
        FilterOperator::Gte => compare(field, actual, expected, Ordering::is_ge),
        FilterOperator::Lt => compare(field, actual, expected, Ordering::is_lt),
        FilterOperator::Lte => compare(field, actual, expected, Ordering::is_le),
        FilterOperator::Between => match expected.as_array().map(Vec::as_slice) {
            Some([low, high]) => {
                compare(field, actual, low, Ordering::is_ge)
                    && compare(field, actual, high, Ordering::is_le)
            }
            _ => false,
        },
        FilterOperator::In => member(field, actual, expected),
        FilterOperator::NotIn => !member(field, actual, expected),
    }
}

/// True when the record passes every filter. `fields[i]` belongs to `filters[i]`.
pub fn matches_all(record: &Record, fields: &[&FieldConfig], filters: &[FilterConfig]) -> bool {
    fields
        .iter()
        .zip(filters)
        .all(|(field, filter)| matches(record, field, filter))
}

fn equals(field: &FieldConfig, actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        _ if is_empty(actual) => is_empty(Some(expected)),
        Some(actual) => field.values_equal(actual, expected),
        None => false,
    }
}

fn text_test(actual: Option<&Value>, expected: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    let actual = actual.map(to_text).unwrap_or_default().to_lowercase();
    let expected = to_text(expected).to_lowercase();
    test(&actual, &expected)
}

fn compare(
    field: &FieldConfig,
    actual: Option<&Value>,
    bound: &Value,
    accept: fn(Ordering) -> bool,
) -> bool {
    if is_empty(actual) {
        return false;
    }
    actual
        .and_then(|a| field.compare_values(a, bound))
        .is_some_and(accept)
}

/// Set membership; for multiselect any element may match.
fn member(field: &FieldConfig, actual: Option<&Value>, expected: &Value) -> bool {
    let Some(candidates) = expected.as_array() else {
        return false;
    };
    match actual {
        _ if is_empty(actual) => false,
        Some(actual) => candidates.iter().any(|c| field.values_equal(actual, c)),
        None => false,
    }
}
