//! Gantt timeline geometry.
//!
//! Bars are placed as percentages of a padded date window so a renderer can
//! draw them at any width.

use chrono::{Days, NaiveDate};
use dataview_fields::value::{to_bool, to_date};
use dataview_fields::Record;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::record_label;
use crate::config::TimelineConfig;

/// Which record fields drive the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineOptions {
    pub start_field: String,
    /// Missing or empty end means the record ends on its start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_field: Option<String>,
    /// Truthy values flag milestones for the renderer; geometry is unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
}

impl TimelineOptions {
    pub fn new(start_field: impl Into<String>) -> Self {
        Self {
            start_field: start_field.into(),
            end_field: None,
            milestone_field: None,
            label_field: None,
        }
    }

    pub fn with_end(mut self, end_field: impl Into<String>) -> Self {
        self.end_field = Some(end_field.into());
        self
    }

    pub fn with_milestone(mut self, milestone_field: impl Into<String>) -> Self {
        self.milestone_field = Some(milestone_field.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBar {
    pub id: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub left_percent: f64,
    pub width_percent: f64,
    pub milestone: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub total_span_days: i64,
    pub bars: Vec<TimelineBar>,
    /// Position of the today marker, when today is inside the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_percent: Option<f64>,
    /// Records without a usable start date.
    pub skipped: Vec<String>,
}

impl Timeline {
    pub fn bar(&self, id: &str) -> Option<&TimelineBar> {
        self.bars.iter().find(|b| b.id == id)
    }

    /// Percentage offset of `date` within the window, unclamped.
    pub fn percent_of(&self, date: NaiveDate) -> f64 {
        (date - self.min_date).num_days() as f64 / self.total_span_days as f64 * 100.0
    }
}

struct Span<'a> {
    record: &'a Record,
    start: NaiveDate,
    end: NaiveDate,
    milestone: bool,
}

/// Lay out `records` on a padded timeline.
pub fn layout(
    records: &[&Record],
    options: &TimelineOptions,
    config: &TimelineConfig,
    today: NaiveDate,
) -> Timeline {
    let mut spans = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for &record in records {
        let Some(start) = record.get(&options.start_field).and_then(to_date) else {
            skipped.push(record.id.clone());
            continue;
        };
        let end = options
            .end_field
            .as_deref()
            .and_then(|f| record.get(f))
            .and_then(to_date)
            .filter(|end| *end >= start)
            .unwrap_or(start);
        let milestone = options
            .milestone_field
            .as_deref()
            .and_then(|f| record.get(f))
            .and_then(to_bool)
            .unwrap_or(false);
        spans.push(Span {
            record,
            start,
            end,
            milestone,
        });
    }

    let (min_date, max_date) = window(&spans, config, today);
    let total_span_days = (max_date - min_date).num_days().max(1);
    let span = total_span_days as f64;

    let bars = spans
        .iter()
        .map(|s| {
            let left = ((s.start - min_date).num_days() as f64 / span * 100.0).clamp(0.0, 100.0);
            let width =
                ((s.end - s.start).num_days() as f64 / span * 100.0).clamp(0.0, 100.0 - left);
            TimelineBar {
                id: s.record.id.clone(),
                label: record_label(s.record, options.label_field.as_deref()),
                start: s.start,
                end: s.end,
                left_percent: left,
                width_percent: width,
                milestone: s.milestone,
            }
        })
        .collect();

    let today_percent = (min_date..=max_date)
        .contains(&today)
        .then(|| (today - min_date).num_days() as f64 / span * 100.0);

    trace!(
        bars = spans.len(),
        skipped = skipped.len(),
        %min_date,
        %max_date,
        "timeline laid out"
    );

    Timeline {
        min_date,
        max_date,
        total_span_days,
        bars,
        today_percent,
        skipped,
    }
}

/// Padded `[min, max]` over all spans, or a window starting today when empty.
fn window(spans: &[Span<'_>], config: &TimelineConfig, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = spans.iter().map(|s| s.start).min();
    let latest = spans.iter().map(|s| s.end).max();

    match (earliest, latest) {
        (Some(min), Some(max)) => {
            let pad = Days::new(config.padding_days);
            (
                min.checked_sub_days(pad).unwrap_or(min),
                max.checked_add_days(pad).unwrap_or(max),
            )
        }
        _ => {
            let end = today
                .checked_add_days(Days::new(config.empty_window_days))
                .unwrap_or(today);
            (today, end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn pads_window_by_configured_days() {
        let records = vec![
            Record::new("a").with("start", "2024-01-01"),
            Record::new("b").with("start", "2024-01-10"),
            Record::new("c").with("start", "2024-01-20"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let timeline = layout(
            &refs,
            &TimelineOptions::new("start"),
            &TimelineConfig::default(),
            date("2024-01-05"),
        );
        assert_eq!(timeline.min_date, date("2023-12-25"));
        assert_eq!(timeline.max_date, date("2024-01-27"));
        assert_eq!(timeline.total_span_days, 33);
        for bar in &timeline.bars {
            assert!(bar.left_percent > 0.0 && bar.left_percent < 100.0);
            assert_eq!(bar.width_percent, 0.0);
        }
        let expected = 11.0 / 33.0 * 100.0;
        assert!((timeline.today_percent.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn width_follows_end_date() {
        let records = vec![Record::new("a")
            .with("start", "2024-03-01")
            .with("end", "2024-03-11")];
        let refs: Vec<&Record> = records.iter().collect();
        let config = TimelineConfig {
            padding_days: 5,
            ..Default::default()
        };
        let timeline = layout(
            &refs,
            &TimelineOptions::new("start").with_end("end"),
            &config,
            date("2025-01-01"),
        );
        let bar = timeline.bar("a").unwrap();
        assert_eq!(timeline.total_span_days, 20);
        assert!((bar.left_percent - 25.0).abs() < 1e-6);
        assert!((bar.width_percent - 50.0).abs() < 1e-6);
        assert!(timeline.today_percent.is_none());
    }

    #[test]
    fn milestones_and_skipped_records() {
        let records = vec![
            Record::new("m")
                .with("start", "2024-03-01")
                .with("end", "2024-03-09")
                .with("ms", true),
            Record::new("nodate").with("start", "soon"),
            Record::new("missing"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let timeline = layout(
            &refs,
            &TimelineOptions::new("start")
                .with_end("end")
                .with_milestone("ms"),
            &TimelineConfig::default(),
            date("2024-03-02"),
        );
        let bar = &timeline.bars[0];
        assert!(bar.milestone);
        assert_eq!(timeline.total_span_days, 22);
        assert!((bar.width_percent - 8.0 / 22.0 * 100.0).abs() < 1e-6);
        assert_eq!(timeline.skipped, vec!["nodate", "missing"]);
    }

    #[test]
    fn end_before_start_collapses_to_start() {
        let records = vec![Record::new("a")
            .with("start", json!("2024-03-10"))
            .with("end", json!("2024-03-01"))];
        let refs: Vec<&Record> = records.iter().collect();
        let timeline = layout(
            &refs,
            &TimelineOptions::new("start").with_end("end"),
            &TimelineConfig::default(),
            date("2024-03-10"),
        );
        assert_eq!(timeline.bars[0].end, date("2024-03-10"));
        assert_eq!(timeline.bars[0].width_percent, 0.0);
    }

    #[test]
    fn empty_set_gets_synthetic_window() {
        let timeline = layout(
            &[],
            &TimelineOptions::new("start"),
            &TimelineConfig::default(),
            date("2024-06-15"),
        );
        assert_eq!(timeline.min_date, date("2024-06-15"));
        assert_eq!(timeline.max_date, date("2024-07-15"));
        assert_eq!(timeline.total_span_days, 30);
        assert_eq!(timeline.today_percent, Some(0.0));
        assert!(timeline.bars.is_empty());
    }
}
