//! Station and line types.

use chrono::{DateTime, FixedOffset};

/// Width of the line code column on the board.
const LINE_CODE_WIDTH: usize = 3;

/// A route/direction entry at a station with upcoming departure countdowns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line code, right-aligned to a fixed width (e.g. `"  2"`, `"13A"`).
    pub name: String,

    /// Destination label. Lines are merged on this value.
    pub direction: String,

    /// Minutes until departure, ascending.
    pub departures: Vec<u32>,

    /// Whether the next vehicle is step-free.
    pub barrier_free: bool,

    /// Whether the provider reports a delay.
    pub delayed: bool,
}

impl Line {
    /// Create a line, padding the code to the board's column width.
    pub fn new(name: &str, direction: impl Into<String>, departures: Vec<u32>) -> Self {
        Self {
            name: display_code(name),
            direction: direction.into(),
            departures,
            barrier_free: false,
            delayed: false,
        }
    }

    /// Set the step-free flag.
    pub fn with_barrier_free(mut self, barrier_free: bool) -> Self {
        self.barrier_free = barrier_free;
        self
    }

    /// Set the delay flag.
    pub fn with_delayed(mut self, delayed: bool) -> Self {
        self.delayed = delayed;
        self
    }
}

/// Right-align a line code to the fixed column width.
///
/// Codes longer than the column are kept intact.
fn display_code(name: &str) -> String {
    let name = name.trim();
    format!("{name:>LINE_CODE_WIDTH$}")
}

/// Bike-share availability at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeStationInfo {
    /// Provider station id.
    pub id: String,

    /// Display name, possibly overridden from configuration.
    pub name: String,

    /// Provider status code (e.g. `"aktiv"`).
    pub status: String,

    /// Bikes currently available.
    pub bike_count: u32,
}

/// A physical stop, unique by display name after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Display name; the merge key across providers.
    pub name: String,

    /// Lines serving this station.
    pub lines: Vec<Line>,

    /// Walking time from home in minutes.
    pub walking_time: Option<u32>,

    /// Bike-share info when a bike station shares this name.
    pub bike_share: Option<BikeStationInfo>,
}

impl Station {
    /// Create a station with the given lines.
    pub fn new(name: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            name: name.into(),
            lines,
            walking_time: None,
            bike_share: None,
        }
    }

    /// Create a station that only carries bike-share info.
    pub fn bike_only(info: BikeStationInfo) -> Self {
        Self {
            name: info.name.clone(),
            lines: Vec::new(),
            walking_time: None,
            bike_share: Some(info),
        }
    }

    /// Whether there is anything to show for this station.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.bike_share.is_none()
    }
}

/// Normalized output of the transit-line provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitBoard {
    /// Stations, unique by name.
    pub stations: Vec<Station>,

    /// Server-reported time of the data.
    pub last_update: DateTime<FixedOffset>,
}
