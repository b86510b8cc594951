//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use dataview_engine::layout::calendar::{CalendarCursor, CalendarOptions};
use dataview_engine::layout::dashboard::DashboardOptions;
use dataview_engine::layout::kanban::{KanbanColumn, KanbanOptions};
use dataview_engine::layout::map::MapOptions;
use dataview_engine::layout::timeline::TimelineOptions;
use dataview_engine::layout::workload::{Resource, WorkloadOptions};
use dataview_engine::{AggregateFn, Aggregation, DataViewEngine, EngineConfig, LayoutOptions};
use dataview_fields::{FieldConfig, FieldSchema, FieldType, Record, SelectOption};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Fixed "today" so date-dependent layouts are reproducible
pub fn today() -> NaiveDate {
    date(2024, 1, 10)
}

pub fn schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldConfig::new("title", "Title", FieldType::Text).required(),
        FieldConfig::select("status", "Status", ["Todo", "Doing", "Done"]),
        FieldConfig::new("points", "Points", FieldType::Number),
        FieldConfig::new("start", "Start", FieldType::Date),
        FieldConfig::new("end", "End", FieldType::Date),
        FieldConfig::new("owners", "Owners", FieldType::Multiselect).with_options(vec![
            SelectOption::new("alice", 0),
            SelectOption::new("bob", 1),
        ]),
        FieldConfig::new("milestone", "Milestone", FieldType::Boolean),
        FieldConfig::new("lat", "Latitude", FieldType::Number).hidden(),
        FieldConfig::new("lng", "Longitude", FieldType::Number).hidden(),
    ])
    .expect("valid schema")
}

pub fn records() -> Vec<Record> {
    vec![
        Record::new("t1")
            .with("title", "Design schema")
            .with("status", "Done")
            .with("points", 3)
            .with("start", "2024-01-01")
            .with("end", "2024-01-05")
            .with("owners", serde_json::json!(["alice"]))
            .with("lat", 52.52)
            .with("lng", 13.40),
        Record::new("t2")
            .with("title", "Build query engine")
            .with("status", "Doing")
            .with("points", 8)
            .with("start", "2024-01-06")
            .with("end", "2024-01-20")
            .with("owners", serde_json::json!(["alice", "bob"]))
            .with("lat", 48.85)
            .with("lng", 2.35),
        Record::new("t3")
            .with("title", "Write docs")
            .with("status", "Todo")
            .with("points", 2)
            .with("start", "2024-01-10")
            .with("owners", serde_json::json!(["bob"])),
        Record::new("t4")
            .with("title", "Release")
            .with("status", "Todo")
            .with("start", "2024-01-15")
            .with("milestone", true),
        Record::new("t5").with("title", "Someday").with("status", "Icebox"),
    ]
}

pub fn layout_options() -> LayoutOptions {
    LayoutOptions {
        kanban: Some(KanbanOptions {
            field: "status".into(),
            columns: vec![
                KanbanColumn::new("todo", "To Do")
                    .with_value("Todo")
                    .with_wip_limit(1),
                KanbanColumn::new("doing", "Doing").with_value("Doing"),
                KanbanColumn::new("done", "Done").with_value("Done"),
            ],
        }),
        timeline: Some(
            TimelineOptions::new("start")
                .with_end("end")
                .with_milestone("milestone"),
        ),
        workload: Some(WorkloadOptions {
            resource_field: "owners".into(),
            effort_field: Some("points".into()),
            resources: vec![Resource::new("alice", 10.0), Resource::new("bob", 8.0)],
        }),
        calendar: Some(
            CalendarOptions::new("start")
                .with_end("end")
                .at(CalendarCursor::new(2024, 1).expect("valid month")),
        ),
        map: Some(MapOptions {
            latitude_field: "lat".into(),
            longitude_field: "lng".into(),
            label_field: None,
        }),
        dashboard: Some(DashboardOptions {
            metrics: vec![
                Aggregation::count(),
                Aggregation::of(AggregateFn::Sum, "points"),
            ],
        }),
    }
}

pub fn engine() -> DataViewEngine {
    DataViewEngine::new(EngineConfig::default()).with_options(layout_options())
}

pub fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records.into_iter().map(|r| r.id.clone()).collect()
}
