//! Query pipeline and view layouts for the data view engine
//!
//! One record set, many views. [`query::evaluate`] turns records, a
//! [`FieldSchema`](dataview_fields::FieldSchema) and a
//! [`ViewState`](dataview_views::ViewState) into ordered, grouped, paged
//! buckets; [`layout::dispatch`] shapes that result for the active view type.
//! [`DataViewEngine`] ties both to a [`ViewStateStore`](dataview_views::ViewStateStore):
//!
//! ```ignore
//! let engine = DataViewEngine::from_yaml("", options_yaml)?;
//! let mut store = engine.new_store(schema.clone())?;
//! store.set_view_type(ViewType::Kanban)?;
//! let output = engine.render(&records, &schema, &mut store, today)?;
//! ```
//!
//! Nothing here fetches data, draws pixels or spawns threads.

pub mod config;
mod engine;
pub mod error;
pub mod layout;
pub mod query;

pub use config::EngineConfig;
pub use engine::{DataViewEngine, ViewOutput};
pub use error::{EngineError, Result};
pub use layout::{dispatch, Layout, LayoutContext, LayoutOptions, Reassign};
pub use query::{evaluate, AggregateFn, Aggregation, Bucket, QueryResult, UNGROUPED};
