//! Named view-state transitions.
//!
//! Each user intent is one `ViewCommand`. Applying a command is a pure
//! function from one `ViewState` to the next; the store owns revisions, the
//! changelog and snapshot swapping.

use std::collections::HashSet;

use dataview_fields::{FieldSchema, FieldsError};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::saved::ViewStatePatch;
use crate::selection::SelectionManager;
use crate::types::{upsert_by_field, FilterConfig, GroupConfig, SortConfig, ViewState, ViewType};

/// A single requested change to a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewCommand {
    SetViewType { view_type: ViewType },
    SetSearch { text: String },
    AddFilter { filter: FilterConfig },
    RemoveFilter { field: String },
    ClearFilters,
    AddSort { sort: SortConfig },
    RemoveSort { field: String },
    ClearSorts,
    AddGroup { group: GroupConfig },
    RemoveGroup { field: String },
    ClearGroups,
    SetPagination { page: usize, page_size: usize },
    ToggleSelection { id: String },
    SelectAll { ids: Vec<String> },
    ClearSelection,
    /// Overlay a saved or persisted partial state, all or nothing.
    ApplyPatch { patch: ViewStatePatch },
}

impl ViewCommand {
    /// Canonical "verb noun" name used in the changelog.
    pub fn op(&self) -> &'static str {
        match self {
            Self::SetViewType { .. } => "set view type",
            Self::SetSearch { .. } => "set search",
            Self::AddFilter { .. } => "add filter",
            Self::RemoveFilter { .. } => "remove filter",
            Self::ClearFilters => "clear filters",
            Self::AddSort { .. } => "add sort",
            Self::RemoveSort { .. } => "remove sort",
            Self::ClearSorts => "clear sorts",
            Self::AddGroup { .. } => "add group",
            Self::RemoveGroup { .. } => "remove group",
            Self::ClearGroups => "clear groups",
            Self::SetPagination { .. } => "set pagination",
            Self::ToggleSelection { .. } => "toggle selection",
            Self::SelectAll { .. } => "select all",
            Self::ClearSelection => "clear selection",
            Self::ApplyPatch { .. } => "apply patch",
        }
    }

    /// Compute the state that follows `state`.
    ///
    /// `visible` is the id set of the last query evaluation; selection
    /// commands never select outside it. Changes to search or filters send
    /// the view back to page 1.
    pub fn apply(
        &self,
        state: &ViewState,
        schema: &FieldSchema,
        visible: &HashSet<String>,
    ) -> Result<ViewState> {
        let mut next = state.clone();
        match self {
            Self::SetViewType { view_type } => next.view_type = *view_type,
            Self::SetSearch { text } => {
                if next.search != *text {
                    next.search = text.clone();
                    next.pagination.page = 1;
                }
            }
            Self::AddFilter { filter } => {
                filter.validate(schema)?;
                upsert_by_field(&mut next.filters, filter.clone(), |f| f.field.as_str());
                if next.filters != state.filters {
                    next.pagination.page = 1;
                }
            }
            Self::RemoveFilter { field } => {
                known_field(schema, field)?;
                next.filters.retain(|f| f.field != *field);
                if next.filters != state.filters {
                    next.pagination.page = 1;
                }
            }
            Self::ClearFilters => {
                if !next.filters.is_empty() {
                    next.filters.clear();
                    next.pagination.page = 1;
                }
            }
            Self::AddSort { sort } => {
                sort.validate(schema)?;
                upsert_by_field(&mut next.sorts, sort.clone(), |s| s.field.as_str());
            }
            Self::RemoveSort { field } => {
                known_field(schema, field)?;
                next.sorts.retain(|s| s.field != *field);
            }
            Self::ClearSorts => next.sorts.clear(),
            Self::AddGroup { group } => {
                group.validate(schema)?;
                upsert_by_field(&mut next.groups, group.clone(), |g| g.field.as_str());
            }
            Self::RemoveGroup { field } => {
                known_field(schema, field)?;
                next.groups.retain(|g| g.field != *field);
            }
            Self::ClearGroups => next.groups.clear(),
            Self::SetPagination { page, page_size } => {
                if *page_size == 0 {
                    return Err(ViewError::InvalidPageSize);
                }
                next.pagination.page_size = *page_size;
                next.pagination.page = next.pagination.clamp_page(*page);
            }
            Self::ToggleSelection { id } => {
                next.selected_ids = SelectionManager::toggle(&state.selected_ids, id, visible);
            }
            Self::SelectAll { ids } => {
                next.selected_ids = SelectionManager::select_all(&state.selected_ids, ids, visible);
            }
            Self::ClearSelection => next.selected_ids = SelectionManager::clear(),
            Self::ApplyPatch { patch } => {
                next = patch.apply_to(state);
                next.validate(schema)?;
            }
        }
        Ok(next)
    }
}

fn known_field(schema: &FieldSchema, key: &str) -> Result<()> {
    if schema.contains(key) {
        Ok(())
    } else {
        Err(FieldsError::FieldNotFound {
            key: key.to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pagination, SortDirection};
    use dataview_fields::{FieldConfig, FieldType, FilterOperator};
    use serde_json::json;

    fn schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldConfig::new("title", "Title", FieldType::Text),
            FieldConfig::new("points", "Points", FieldType::Number),
            FieldConfig::select("status", "Status", ["Todo", "Doing", "Done"]),
        ])
        .unwrap()
    }

    fn apply(cmd: ViewCommand, state: &ViewState) -> Result<ViewState> {
        cmd.apply(state, &schema(), &HashSet::new())
    }

    #[test]
    fn serializes_with_op_tag() {
        let cmd = ViewCommand::AddSort {
            sort: SortConfig::desc("points"),
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["op"], "add_sort");
        assert_eq!(value["sort"]["field"], "points");
        assert_eq!(serde_json::from_value::<ViewCommand>(value).unwrap(), cmd);
        assert_eq!(cmd.op(), "add sort");
    }

    #[test]
    fn filter_change_resets_page() {
        let mut state = ViewState::default();
        state.pagination = Pagination {
            page: 3,
            page_size: 10,
            total: 100,
        };
        let next = apply(
            ViewCommand::AddFilter {
                filter: FilterConfig::equals("status", json!("Todo")),
            },
            &state,
        )
        .unwrap();
        assert_eq!(next.pagination.page, 1);
        assert_eq!(next.filters.len(), 1);
    }

    #[test]
    fn sort_replacement_keeps_priority() {
        let state = ViewState {
            sorts: vec![SortConfig::asc("points"), SortConfig::asc("title")],
            ..Default::default()
        };
        let next = apply(
            ViewCommand::AddSort {
                sort: SortConfig::desc("points"),
            },
            &state,
        )
        .unwrap();
        assert_eq!(next.sorts[0].field, "points");
        assert_eq!(next.sorts[0].direction, SortDirection::Desc);
        assert_eq!(next.sorts.len(), 2);
    }

    #[test]
    fn invalid_field_leaves_error() {
        let state = ViewState::default();
        let err = apply(
            ViewCommand::AddGroup {
                group: GroupConfig::by("points"),
            },
            &state,
        )
        .unwrap_err();
        assert!(err.is_invalid_field());

        let err = apply(
            ViewCommand::RemoveFilter {
                field: "ghost".into(),
            },
            &state,
        )
        .unwrap_err();
        assert!(err.is_invalid_field());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = apply(
            ViewCommand::SetPagination {
                page: 1,
                page_size: 0,
            },
            &ViewState::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::InvalidPageSize));
    }

    #[test]
    fn pagination_is_clamped_to_total() {
        let mut state = ViewState::default();
        state.pagination.total = 42;
        let next = apply(
            ViewCommand::SetPagination {
                page: 99,
                page_size: 10,
            },
            &state,
        )
        .unwrap();
        assert_eq!(next.pagination.page, 5);
    }

    #[test]
    fn type_mismatch_operator() {
        let err = apply(
            ViewCommand::AddFilter {
                filter: FilterConfig::new("status", FilterOperator::Between, json!(["a", "b"])),
            },
            &ViewState::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ViewError::Field(FieldsError::TypeMismatch { .. })
        ));
    }
}
