//! ViewStateStore: the single owner of a view's state.
//!
//! Every transition goes through [`ViewStateStore::dispatch`]. A successful
//! transition swaps in a fresh `Arc<ViewState>` snapshot; a failed one leaves
//! the previous snapshot in place. Snapshots handed out earlier are never
//! mutated.

use std::collections::HashSet;
use std::sync::Arc;

use dataview_fields::FieldSchema;
use serde_json::Value;
use tracing::{debug, trace};

use crate::command::ViewCommand;
use crate::error::{Result, ViewError};
use crate::log::{ExecutionResult, LogEntry};
use crate::saved::{SavedView, ViewStatePatch, ViewStatePort};
use crate::selection::SelectionManager;
use crate::types::{FilterConfig, GroupConfig, SortConfig, ViewState, ViewType};

/// Holds the current state snapshot, its revision, and the changelog.
#[derive(Debug)]
pub struct ViewStateStore {
    schema: Arc<FieldSchema>,
    state: Arc<ViewState>,
    revision: u64,
    visible: HashSet<String>,
    log: Vec<LogEntry>,
    actor: Option<String>,
}

impl ViewStateStore {
    /// A store with the default grid state.
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema: Arc::new(schema),
            state: Arc::new(ViewState::default()),
            revision: 0,
            visible: HashSet::new(),
            log: Vec::new(),
            actor: None,
        }
    }

    /// A store seeded with `state`, which must be valid for `schema`.
    pub fn with_state(schema: FieldSchema, state: ViewState) -> Result<Self> {
        state.validate(&schema)?;
        let mut store = Self::new(schema);
        store.state = Arc::new(state);
        Ok(store)
    }

    /// Attribute subsequent changelog entries to `actor`.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<ViewState> {
        Arc::clone(&self.state)
    }

    /// Number of state-changing commands applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Ids that passed search and filters in the last evaluation.
    pub fn visible_ids(&self) -> &HashSet<String> {
        &self.visible
    }

    /// Apply `cmd`, reporting whether it was logged.
    pub fn execute(&mut self, cmd: ViewCommand) -> ExecutionResult<Arc<ViewState>, ViewError> {
        let next = match cmd.apply(&self.state, &self.schema, &self.visible) {
            Ok(next) => next,
            Err(error) => {
                debug!(op = cmd.op(), %error, "view command rejected");
                return ExecutionResult::Failed { error };
            }
        };

        if next == *self.state {
            trace!(op = cmd.op(), "view command left state unchanged");
            return ExecutionResult::Unlogged { value: self.state() };
        }

        let input = match serde_json::to_value(&cmd) {
            Ok(input) => input,
            Err(e) => return ExecutionResult::Failed { error: e.into() },
        };

        self.revision += 1;
        self.state = Arc::new(next);

        let mut log_entry = LogEntry::new(cmd.op(), input, self.revision);
        if let Some(actor) = &self.actor {
            log_entry = log_entry.with_actor(actor.clone());
        }
        self.log.push(log_entry.clone());

        debug!(op = cmd.op(), revision = self.revision, "view command applied");
        ExecutionResult::Logged {
            value: self.state(),
            log_entry,
        }
    }

    /// Apply `cmd` and return the resulting snapshot.
    pub fn dispatch(&mut self, cmd: ViewCommand) -> Result<Arc<ViewState>> {
        self.execute(cmd).into_result()
    }

    /// Apply `cmd` only if no other command landed since `revision`.
    pub fn dispatch_at(&mut self, revision: u64, cmd: ViewCommand) -> Result<Arc<ViewState>> {
        if revision != self.revision {
            return Err(ViewError::StaleRevision {
                expected: revision,
                current: self.revision,
            });
        }
        self.dispatch(cmd)
    }

    // --- Named transitions ---

    pub fn set_view_type(&mut self, view_type: ViewType) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::SetViewType { view_type })
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::SetSearch { text: text.into() })
    }

    pub fn add_filter(&mut self, filter: FilterConfig) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::AddFilter { filter })
    }

    pub fn remove_filter(&mut self, field: impl Into<String>) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::RemoveFilter {
            field: field.into(),
        })
    }

    pub fn clear_filters(&mut self) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::ClearFilters)
    }

    pub fn add_sort(&mut self, sort: SortConfig) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::AddSort { sort })
    }

    pub fn remove_sort(&mut self, field: impl Into<String>) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::RemoveSort {
            field: field.into(),
        })
    }

    pub fn clear_sorts(&mut self) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::ClearSorts)
    }

    pub fn add_group(&mut self, group: GroupConfig) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::AddGroup { group })
    }

    pub fn remove_group(&mut self, field: impl Into<String>) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::RemoveGroup {
            field: field.into(),
        })
    }

    pub fn clear_groups(&mut self) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::ClearGroups)
    }

    pub fn set_pagination(&mut self, page: usize, page_size: usize) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::SetPagination { page, page_size })
    }

    pub fn toggle_selection(&mut self, id: impl Into<String>) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::ToggleSelection { id: id.into() })
    }

    pub fn select_all<I, S>(&mut self, ids: I) -> Result<Arc<ViewState>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(ViewCommand::SelectAll {
            ids: ids.into_iter().map(Into::into).collect(),
        })
    }

    pub fn clear_selection(&mut self) -> Result<Arc<ViewState>> {
        self.dispatch(ViewCommand::ClearSelection)
    }

    // --- Query feedback ---

    /// Record the outcome of a query evaluation.
    ///
    /// Updates the total, re-clamps the page and prunes the selection to
    /// `visible_ids`. Derived bookkeeping: no revision bump, no log entry.
    pub fn sync<I>(&mut self, total: usize, visible_ids: I) -> Arc<ViewState>
    where
        I: IntoIterator<Item = String>,
    {
        self.visible = visible_ids.into_iter().collect();

        let pagination = self.state.pagination.with_total(total);
        let selected = SelectionManager::prune(&self.state.selected_ids, &self.visible);

        if pagination != self.state.pagination || selected != self.state.selected_ids {
            let mut next = (*self.state).clone();
            next.pagination = pagination;
            next.selected_ids = selected;
            self.state = Arc::new(next);
        }

        trace!(
            total,
            visible = self.visible.len(),
            selected = self.state.selected_ids.len(),
            "view state synced"
        );
        self.state()
    }

    /// Swap in a new schema. The current state must remain valid under it.
    pub fn replace_schema(&mut self, schema: FieldSchema) -> Result<()> {
        self.state.validate(&schema)?;
        self.schema = Arc::new(schema);
        debug!(fields = self.schema.len(), "view schema replaced");
        Ok(())
    }

    // --- Persistence ---

    /// Save the persistable part of the current state under `key`.
    pub fn persist(&self, port: &mut dyn ViewStatePort, key: &str) -> Result<()> {
        port.save(key, &ViewStatePatch::capture(&self.state))
    }

    /// Restore the state saved under `key`, if any.
    ///
    /// Every filter, sort and group is checked against the schema first;
    /// nothing is applied unless all of them are valid.
    pub fn restore(&mut self, port: &dyn ViewStatePort, key: &str) -> Result<Option<Arc<ViewState>>> {
        match port.load(key)? {
            Some(patch) => self.dispatch(ViewCommand::ApplyPatch { patch }).map(Some),
            None => Ok(None),
        }
    }

    /// Apply a saved view on top of the current state.
    pub fn apply_saved(&mut self, saved: &SavedView) -> Result<Arc<ViewState>> {
        let mut patch = saved.state.clone();
        patch.view_type = Some(saved.view_type);
        self.dispatch(ViewCommand::ApplyPatch { patch })
    }

    /// The changelog as JSON, oldest first.
    pub fn log_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.log)?)
    }
}
