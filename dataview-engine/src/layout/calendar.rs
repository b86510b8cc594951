//! Month grid bucketing.
//!
//! A month is shown as complete Sunday-to-Saturday weeks. Records land on
//! the day of their start date; an optional end date spreads them across
//! every day they cover inside the grid.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use dataview_fields::value::to_date;
use dataview_fields::Record;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::record_label;
use crate::error::{EngineError, Result};

/// ISO date used as a day bucket key.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarOptions {
    pub date_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
    /// Month to show; defaults to the month containing today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<CalendarCursor>,
}

impl CalendarOptions {
    pub fn new(date_field: impl Into<String>) -> Self {
        Self {
            date_field: date_field.into(),
            end_field: None,
            label_field: None,
            cursor: None,
        }
    }

    pub fn with_end(mut self, end_field: impl Into<String>) -> Self {
        self.end_field = Some(end_field.into());
        self
    }

    pub fn at(mut self, cursor: CalendarCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

/// The month a calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCursor {
    year: i32,
    month: u32,
}

impl CalendarCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::containing)
            .ok_or(EngineError::InvalidMonth { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Re-centre on the current month.
    pub fn today(today: NaiveDate) -> Self {
        Self::containing(today)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(EngineError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or(EngineError::InvalidMonth {
                year: self.year,
                month: self.month,
            })
    }

    pub fn next(&self) -> Result<Self> {
        self.shift(|d| d.checked_add_months(Months::new(1)))
    }

    pub fn previous(&self) -> Result<Self> {
        self.shift(|d| d.checked_sub_months(Months::new(1)))
    }

    fn shift(&self, f: impl Fn(NaiveDate) -> Option<NaiveDate>) -> Result<Self> {
        f(self.first_day()?)
            .map(Self::containing)
            .ok_or(EngineError::InvalidMonth {
                year: self.year,
                month: self.month,
            })
    }

    /// First and last day of the grid: the Sunday on or before the 1st
    /// through the Saturday on or after the last day of the month.
    pub fn grid_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let first = self.first_day()?;
        let last = self.last_day()?;
        let lead = Days::new(u64::from(first.weekday().num_days_from_sunday()));
        let trail = Days::new(u64::from(6 - last.weekday().num_days_from_sunday()));
        let invalid = || EngineError::InvalidMonth {
            year: self.year,
            month: self.month,
        };
        Ok((
            first.checked_sub_days(lead).ok_or_else(invalid)?,
            last.checked_add_days(trail).ok_or_else(invalid)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CalendarEvent {
    pub fn is_multi_day(&self) -> bool {
        self.end > self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub key: String,
    pub in_month: bool,
    pub is_today: bool,
    /// At most `max_events_per_day` events.
    pub events: Vec<CalendarEvent>,
    /// Events not shown in `events`.
    pub overflow: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub cursor: CalendarCursor,
    pub weeks: Vec<Vec<CalendarDay>>,
    /// Records without a usable date.
    pub undated: Vec<String>,
}

impl CalendarMonth {
    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.weeks.iter().flatten().find(|d| d.date == date)
    }

    pub fn cell_count(&self) -> usize {
        self.weeks.iter().map(Vec::len).sum()
    }
}

/// Group records by the ISO date of their start field, time discarded.
///
/// Records whose date does not parse are left out.
pub fn bucket_by_day<'a>(records: &[&'a Record], date_field: &str) -> BTreeMap<String, Vec<&'a Record>> {
    let mut buckets: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();
    for &record in records {
        if let Some(date) = record.get(date_field).and_then(to_date) {
            buckets.entry(day_key(date)).or_default().push(record);
        }
    }
    buckets
}

/// Build the month grid at the options' cursor, or today's month.
pub fn layout(
    records: &[&Record],
    options: &CalendarOptions,
    max_events_per_day: usize,
    today: NaiveDate,
) -> Result<CalendarMonth> {
    let cursor = options.cursor.unwrap_or_else(|| CalendarCursor::today(today));
    let (grid_start, grid_end) = cursor.grid_range()?;

    let mut by_day: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    let mut undated = Vec::new();

    for &record in records {
        let Some(start) = record.get(&options.date_field).and_then(to_date) else {
            undated.push(record.id.clone());
            continue;
        };
        let end = options
            .end_field
            .as_deref()
            .and_then(|f| record.get(f))
            .and_then(to_date)
            .filter(|end| *end >= start)
            .unwrap_or(start);

        let event = CalendarEvent {
            id: record.id.clone(),
            label: record_label(record, options.label_field.as_deref()),
            start,
            end,
        };

        let first = start.max(grid_start);
        let last = end.min(grid_end);
        for day in first.iter_days().take_while(|d| *d <= last) {
            by_day.entry(day).or_default().push(event.clone());
        }
    }

    let days: Vec<CalendarDay> = grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| {
            let mut events = by_day.remove(&date).unwrap_or_default();
            let overflow = events.len().saturating_sub(max_events_per_day);
            events.truncate(max_events_per_day);
            CalendarDay {
                date,
                key: day_key(date),
                in_month: date.month() == cursor.month() && date.year() == cursor.year(),
                is_today: date == today,
                events,
                overflow,
            }
        })
        .collect();

    let weeks: Vec<Vec<CalendarDay>> = days.chunks(7).map(<[CalendarDay]>::to_vec).collect();
    trace!(
        year = cursor.year(),
        month = cursor.month(),
        cells = days.len(),
        undated = undated.len(),
        "calendar laid out"
    );

    Ok(CalendarMonth {
        cursor,
        weeks,
        undated,
    })
}
