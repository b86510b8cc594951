//! View-type dispatch.
//!
//! Each [`ViewType`] maps to exactly one layout strategy. Strategies are plain
//! functions over a [`QueryResult`]; [`dispatch`] picks one and supplies the
//! options and context it needs.
//!
//! | View type                   | Layout                        |
//! |-----------------------------|-------------------------------|
//! | grid, list, card, asset     | paged record buckets          |
//! | kanban                      | board columns                 |
//! | gantt                       | timeline bars                 |
//! | workload                    | resource utilization          |
//! | calendar                    | month grid                    |
//! | map                         | markers and bounds            |
//! | dashboard                   | aggregate metrics             |
//! | form, detail                | formatted focused record      |

pub mod calendar;
pub mod dashboard;
pub mod detail;
pub mod kanban;
pub mod map;
pub mod timeline;
pub mod workload;

use chrono::NaiveDate;
use dataview_fields::value::to_text;
use dataview_fields::{FieldSchema, Record};
use dataview_views::{ViewState, ViewType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::query::{Bucket, QueryResult};

pub use calendar::{CalendarCursor, CalendarMonth, CalendarOptions};
pub use dashboard::{Dashboard, DashboardOptions};
pub use detail::DetailLayout;
pub use kanban::{KanbanBoard, KanbanColumn, KanbanOptions, Reassign};
pub use map::{MapLayout, MapOptions};
pub use timeline::{Timeline, TimelineOptions};
pub use workload::{Resource, Workload, WorkloadOptions};

/// Per-view layout settings. Only the section for the active view type is
/// consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanban: Option<KanbanOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<WorkloadOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardOptions>,
}

impl LayoutOptions {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }
}

/// Everything a layout may need besides the query result.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'c> {
    pub schema: &'c FieldSchema,
    pub state: &'c ViewState,
    pub config: &'c EngineConfig,
    pub today: NaiveDate,
}

/// Renderer-ready output for one view type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout<'a> {
    Records { buckets: Vec<Bucket<'a>> },
    Board(KanbanBoard<'a>),
    Timeline(Timeline),
    Workload(Workload),
    Calendar(CalendarMonth),
    Map(MapLayout),
    Dashboard(Dashboard),
    Detail(DetailLayout),
}

/// Select and run the layout for `view_type`.
pub fn dispatch<'a>(
    view_type: ViewType,
    result: &QueryResult<'a>,
    options: &LayoutOptions,
    ctx: &LayoutContext<'_>,
) -> Result<Layout<'a>> {
    let records = &result.ordered;

    let layout = match view_type {
        ViewType::Grid | ViewType::List | ViewType::Card | ViewType::Asset => Layout::Records {
            buckets: result.buckets.clone(),
        },
        ViewType::Kanban => {
            let opts = require(view_type, "kanban", options.kanban.as_ref())?;
            Layout::Board(kanban::layout(records, opts))
        }
        ViewType::Gantt => {
            let opts = require(view_type, "timeline", options.timeline.as_ref())?;
            Layout::Timeline(timeline::layout(
                records,
                opts,
                &ctx.config.timeline,
                ctx.today,
            ))
        }
        ViewType::Workload => {
            let opts = require(view_type, "workload", options.workload.as_ref())?;
            Layout::Workload(workload::layout(records, opts))
        }
        ViewType::Calendar => {
            let opts = require(view_type, "calendar", options.calendar.as_ref())?;
            Layout::Calendar(calendar::layout(
                records,
                opts,
                ctx.config.calendar.max_events_per_day,
                ctx.today,
            )?)
        }
        ViewType::Map => {
            let opts = require(view_type, "map", options.map.as_ref())?;
            Layout::Map(map::layout(records, opts))
        }
        ViewType::Dashboard => {
            let opts = require(view_type, "dashboard", options.dashboard.as_ref())?;
            Layout::Dashboard(dashboard::layout(result, opts, ctx.schema)?)
        }
        ViewType::Form | ViewType::Detail => {
            Layout::Detail(detail::layout(result, ctx.state, ctx.schema))
        }
    };

    debug!(view_type = %view_type, records = records.len(), "layout dispatched");
    Ok(layout)
}

fn require<'o, T>(view_type: ViewType, section: &str, options: Option<&'o T>) -> Result<&'o T> {
    options.ok_or_else(|| EngineError::missing_options(view_type, section))
}

/// Text shown for a record: the label field if set and non-empty, else the
/// `title` or `name` field, else the id.
pub(crate) fn record_label(record: &Record, label_field: Option<&str>) -> String {
    label_field
        .into_iter()
        .chain(["title", "name"])
        .filter_map(|key| record.get(key))
        .map(to_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| record.id.clone())
}
