//! The render loop: query, sync the store, lay out.

use std::sync::Arc;

use chrono::NaiveDate;
use dataview_fields::{FieldSchema, Record};
use dataview_views::{ViewState, ViewStateStore, ViewType};
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::layout::{self, Layout, LayoutContext, LayoutOptions, Reassign};
use crate::query::{self, QueryResult};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct ViewOutput<'a> {
    /// The store snapshot after syncing with this result.
    pub state: Arc<ViewState>,
    pub result: QueryResult<'a>,
    pub layout: Layout<'a>,
}

impl ViewOutput<'_> {
    /// The layout as JSON, tagged by `kind`.
    pub fn layout_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.layout)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataViewEngine {
    config: EngineConfig,
    options: LayoutOptions,
}

impl DataViewEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            options: LayoutOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Build from two YAML documents; either may be empty.
    pub fn from_yaml(config: &str, options: &str) -> Result<Self> {
        Ok(Self::new(EngineConfig::from_yaml_str(config)?)
            .with_options(LayoutOptions::from_yaml_str(options)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut LayoutOptions {
        &mut self.options
    }

    /// A store for `schema` using the configured default page size.
    pub fn new_store(&self, schema: FieldSchema) -> Result<ViewStateStore> {
        let mut state = ViewState::default();
        state.pagination.page_size = self.config.pagination.default_page_size;
        Ok(ViewStateStore::with_state(schema, state)?)
    }

    /// Evaluate the store's current state over `records` and lay it out.
    ///
    /// A changed `schema` is installed in the store first, so a state that
    /// references a field the new schema lacks fails here without touching
    /// the store.
    pub fn render<'a>(
        &self,
        records: &'a [Record],
        schema: &FieldSchema,
        store: &mut ViewStateStore,
        today: NaiveDate,
    ) -> Result<ViewOutput<'a>> {
        if store.schema().as_ref() != schema {
            store.replace_schema(schema.clone())?;
        }

        let result = query::evaluate(records, schema, &store.state())?;
        let state = store.sync(result.pagination.total, result.visible_ids());

        let ctx = LayoutContext {
            schema,
            state: &state,
            config: &self.config,
            today,
        };
        let layout = layout::dispatch(state.view_type, &result, &self.options, &ctx)?;

        debug!(
            view_type = %state.view_type,
            total = result.pagination.total,
            revision = store.revision(),
            "view rendered"
        );
        Ok(ViewOutput {
            state,
            result,
            layout,
        })
    }

    /// Move a record to another kanban column.
    pub fn reassign(&self, records: &mut [Record], reassign: &Reassign) -> Result<Option<Value>> {
        let options = self
            .options
            .kanban
            .as_ref()
            .ok_or_else(|| EngineError::missing_options(ViewType::Kanban, "kanban"))?;
        reassign.apply(records, options)
    }
}
