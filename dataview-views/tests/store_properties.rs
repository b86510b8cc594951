//! Property-based tests for the view state store
//!
//! Random command sequences must never break the store's invariants: the
//! selection stays inside the visible set, the page stays in range, and a
//! failed command never changes the snapshot.

use std::sync::Arc;

use dataview_fields::{FieldConfig, FieldSchema, FieldType, FilterOperator};
use dataview_views::{FilterConfig, SortConfig, ViewCommand, ViewStateStore};
use proptest::prelude::*;
use serde_json::json;

fn schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldConfig::new("title", "Title", FieldType::Text),
        FieldConfig::new("points", "Points", FieldType::Number),
        FieldConfig::select("status", "Status", ["Todo", "Doing", "Done"]),
    ])
    .expect("valid schema")
}

/// Record ids drawn from a small pool so collisions happen
fn record_id() -> impl Strategy<Value = String> {
    (0u8..12).prop_map(|n| format!("r{n}"))
}

fn command() -> impl Strategy<Value = ViewCommand> {
    prop_oneof![
        record_id().prop_map(|id| ViewCommand::ToggleSelection { id }),
        prop::collection::vec(record_id(), 0..8).prop_map(|ids| ViewCommand::SelectAll { ids }),
        Just(ViewCommand::ClearSelection),
        (0usize..20, 0usize..15)
            .prop_map(|(page, page_size)| ViewCommand::SetPagination { page, page_size }),
        "[a-z]{0,3}".prop_map(|text| ViewCommand::SetSearch { text }),
        (0i64..10).prop_map(|n| ViewCommand::AddFilter {
            filter: FilterConfig::new("points", FilterOperator::Gte, json!(n)),
        }),
        prop_oneof![Just("title"), Just("points"), Just("ghost")].prop_map(|f| {
            ViewCommand::AddSort {
                sort: SortConfig::asc(f),
            }
        }),
        Just(ViewCommand::ClearFilters),
    ]
}

proptest! {
    /// Property: selection is always a subset of the visible ids
    #[test]
    fn prop_selection_subset_of_visible(
        visible in prop::collection::hash_set(record_id(), 0..10),
        total in 0usize..200,
        commands in prop::collection::vec(command(), 0..30),
    ) {
        let mut store = ViewStateStore::new(schema());
        store.sync(total, visible.iter().cloned());

        for cmd in commands {
            let _ = store.dispatch(cmd);
            let state = store.state();
            prop_assert!(state.selected_ids.iter().all(|id| visible.contains(id)));
            prop_assert!(state.pagination.page >= 1);
            prop_assert!(state.pagination.page <= state.pagination.page_count());
            prop_assert!(state.pagination.page_size > 0);
        }
    }

    /// Property: a rejected command leaves the exact same snapshot in place
    #[test]
    fn prop_failure_retains_snapshot(commands in prop::collection::vec(command(), 0..30)) {
        let mut store = ViewStateStore::new(schema());
        store.sync(50, (0..12).map(|n| format!("r{n}")));

        for cmd in commands {
            let before = store.state();
            let revision = store.revision();
            if store.dispatch(cmd).is_err() {
                prop_assert!(Arc::ptr_eq(&before, &store.state()));
                prop_assert_eq!(revision, store.revision());
            }
        }
    }

    /// Property: applying any command twice equals applying it once
    #[test]
    fn prop_filter_and_sort_idempotent(cmd in command()) {
        prop_assume!(!matches!(cmd, ViewCommand::ToggleSelection { .. }));

        let mut store = ViewStateStore::new(schema());
        store.sync(50, (0..12).map(|n| format!("r{n}")));

        if store.dispatch(cmd.clone()).is_ok() {
            let once = store.state();
            let log_len = store.log().len();
            store.dispatch(cmd).expect("second apply succeeds");
            prop_assert_eq!(&*once, &*store.state());
            prop_assert_eq!(log_len, store.log().len());
        }
    }

    /// Property: the pagination clamp never leaves [1, page_count]
    #[test]
    fn prop_pagination_clamp(total in 0usize..1000, page in 0usize..200, page_size in 1usize..100) {
        let mut store = ViewStateStore::new(schema());
        store.sync(total, Vec::new());
        let state = store.set_pagination(page, page_size).expect("positive page size");
        let pages = total.div_ceil(page_size).max(1);
        prop_assert_eq!(state.pagination.page, page.clamp(1, pages));
    }
}
