//! Engine configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! timeline:
//!   padding_days: 14
//! calendar:
//!   max_events_per_day: 5
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timeline: TimelineConfig,
    pub calendar: CalendarConfig,
    pub pagination: PaginationConfig,
}

impl EngineConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Days added before the earliest start and after the latest end.
    pub padding_days: u64,
    /// Width of the window shown when there is nothing to lay out.
    pub empty_window_days: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            padding_days: 7,
            empty_window_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub max_events_per_day: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_events_per_day: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: dataview_views::DEFAULT_PAGE_SIZE,
        }
    }
}
