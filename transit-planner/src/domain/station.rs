//! Catalog types: stations and lines as supplied by the catalog collaborator.

use serde::{Deserialize, Serialize};

use super::{LineId, StationId};

/// A physical station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station id
    pub id: StationId,

    /// Display name
    pub name: String,

    /// Latitude in degrees (informational only)
    #[serde(default)]
    pub latitude: f64,

    /// Longitude in degrees (informational only)
    #[serde(default)]
    pub longitude: f64,

    /// Lines this station claims to be served by.
    ///
    /// May be empty, in which case membership is taken from the line
    /// sequences alone.
    #[serde(default)]
    pub line_ids: Vec<LineId>,
}

impl Station {
    /// Create a station with no coordinates and no claimed lines.
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            latitude: 0.0,
            longitude: 0.0,
            line_ids: Vec::new(),
        }
    }

    /// Set the coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Set the claimed line membership.
    pub fn with_lines(mut self, line_ids: Vec<LineId>) -> Self {
        self.line_ids = line_ids;
        self
    }
}

/// A line: an ordered sequence of stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Unique line id
    pub id: LineId,

    /// Display name (e.g., "Line 2")
    pub name: String,

    /// Display color, as supplied by the catalog (e.g., "#00A84D")
    #[serde(default)]
    pub color: String,

    /// Stations in running order. Adjacent entries are connected by a
    /// ride edge.
    pub station_ids: Vec<StationId>,

    /// Travel time for each consecutive pair of stations.
    ///
    /// When absent, every hop uses the graph's default hop time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_times_minutes: Option<Vec<u32>>,
}

impl Line {
    /// Create a line using the default hop time for every hop.
    pub fn new(id: LineId, name: impl Into<String>, station_ids: Vec<StationId>) -> Self {
        Self {
            id,
            name: name.into(),
            color: String::new(),
            station_ids,
            travel_times_minutes: None,
        }
    }

    /// Set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set per-hop travel times.
    pub fn with_travel_times(mut self, minutes: Vec<u32>) -> Self {
        self.travel_times_minutes = Some(minutes);
        self
    }
}
