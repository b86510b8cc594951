//! Saved views and the persistence port.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::types::{FilterConfig, GroupConfig, Pagination, SortConfig, ViewState, ViewType};

/// A partial view state. Selection and totals are never persisted.
///
/// Absent parts leave the target state untouched when applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewStatePatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<ViewType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<SortConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl ViewStatePatch {
    /// Everything persistable about `state`.
    pub fn capture(state: &ViewState) -> Self {
        Self {
            view_type: Some(state.view_type),
            search: Some(state.search.clone()),
            filters: Some(state.filters.clone()),
            sorts: Some(state.sorts.clone()),
            groups: Some(state.groups.clone()),
            page_size: Some(state.pagination.page_size),
        }
    }

    /// Overlay onto `state`. The result starts on page 1 and is not validated.
    pub fn apply_to(&self, state: &ViewState) -> ViewState {
        let mut next = state.clone();
        if let Some(view_type) = self.view_type {
            next.view_type = view_type;
        }
        if let Some(search) = &self.search {
            next.search = search.clone();
        }
        if let Some(filters) = &self.filters {
            next.filters = filters.clone();
        }
        if let Some(sorts) = &self.sorts {
            next.sorts = sorts.clone();
        }
        if let Some(groups) = &self.groups {
            next.groups = groups.clone();
        }
        let page_size = self.page_size.unwrap_or(state.pagination.page_size);
        next.pagination = Pagination {
            page: 1,
            page_size,
            total: state.pagination.total,
        };
        next
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named, user-saved view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: ViewType,
    pub state: ViewStatePatch,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedView {
    /// Snapshot `state` under a new id.
    pub fn capture(name: impl Into<String>, state: &ViewState) -> Self {
        let now = Utc::now();
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.into(),
            view_type: state.view_type,
            state: ViewStatePatch::capture(state),
            is_default: false,
            is_shared: false,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn created_by(mut self, actor: impl Into<String>) -> Self {
        self.created_by = Some(actor.into());
        self
    }

    pub fn shared(mut self) -> Self {
        self.is_shared = true;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Replace the saved state with `state`; id and creation metadata stay.
    pub fn update(&mut self, state: &ViewState) {
        self.view_type = state.view_type;
        self.state = ViewStatePatch::capture(state);
        self.updated_at = Utc::now();
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }
}

/// Where a store persists and restores its partial state.
pub trait ViewStatePort {
    fn load(&self, key: &str) -> Result<Option<ViewStatePatch>>;
    fn save(&mut self, key: &str, patch: &ViewStatePatch) -> Result<()>;
}

/// Keeps patches as JSON strings in memory, the way a browser key-value
/// store would.
#[derive(Debug, Default)]
pub struct MemoryViewStatePort {
    entries: HashMap<String, String>,
}

impl MemoryViewStatePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(key.into(), raw.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ViewStatePort for MemoryViewStatePort {
    fn load(&self, key: &str) -> Result<Option<ViewStatePatch>> {
        self.entries
            .get(key)
            .map(|raw| serde_json::from_str(raw).map_err(ViewError::from))
            .transpose()
    }

    fn save(&mut self, key: &str, patch: &ViewStatePatch) -> Result<()> {
        let raw = serde_json::to_string(patch)?;
        self.entries.insert(key.to_string(), raw);
        Ok(())
    }
}
