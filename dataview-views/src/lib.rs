//! View state for the data view engine
//!
//! A view instance is described entirely by a serialisable [`ViewState`]. The
//! [`ViewStateStore`] owns it and changes it only through named
//! [`ViewCommand`]s, keeping a revision counter and a changelog of every
//! command that actually changed something.
//!
//! ```ignore
//! let mut store = ViewStateStore::new(schema);
//! store.add_filter(FilterConfig::equals("status", "Todo"))?;
//! store.add_sort(SortConfig::desc("priority"))?;
//! // after evaluating a query:
//! store.sync(result.pagination.total, result.visible_ids());
//! ```

mod command;
pub mod error;
mod log;
mod saved;
mod selection;
mod store;
pub mod types;

pub use command::ViewCommand;
pub use error::{Result, ViewError};
pub use log::{ExecutionResult, LogEntry};
pub use saved::{MemoryViewStatePort, SavedView, ViewStatePatch, ViewStatePort};
pub use selection::SelectionManager;
pub use store::ViewStateStore;
pub use types::{
    FilterConfig, GroupConfig, Pagination, SortConfig, SortDirection, ViewState, ViewType,
    DEFAULT_PAGE_SIZE,
};
