//! Map markers and their bounding box.

use dataview_fields::value::to_number;
use dataview_fields::Record;
use serde::{Deserialize, Serialize};

use super::record_label;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub latitude_field: String,
    pub longitude_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl MapBounds {
    fn around(marker: &MapMarker) -> Self {
        Self {
            south: marker.latitude,
            west: marker.longitude,
            north: marker.latitude,
            east: marker.longitude,
        }
    }

    fn extend(mut self, marker: &MapMarker) -> Self {
        self.south = self.south.min(marker.latitude);
        self.north = self.north.max(marker.latitude);
        self.west = self.west.min(marker.longitude);
        self.east = self.east.max(marker.longitude);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub markers: Vec<MapMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<MapBounds>,
    /// Records with missing or out-of-range coordinates.
    pub unlocated: Vec<String>,
}

pub fn layout(records: &[&Record], options: &MapOptions) -> MapLayout {
    let mut markers = Vec::new();
    let mut unlocated = Vec::new();

    for &record in records {
        let lat = record.get(&options.latitude_field).and_then(to_number);
        let lng = record.get(&options.longitude_field).and_then(to_number);
        match (lat, lng) {
            (Some(latitude), Some(longitude))
                if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) =>
            {
                markers.push(MapMarker {
                    id: record.id.clone(),
                    label: record_label(record, options.label_field.as_deref()),
                    latitude,
                    longitude,
                });
            }
            _ => unlocated.push(record.id.clone()),
        }
    }

    let bounds = markers
        .split_first()
        .map(|(first, rest)| rest.iter().fold(MapBounds::around(first), MapBounds::extend));

    MapLayout {
        markers,
        bounds,
        unlocated,
    }
}
