//! The merged, display-ready view of all stations.

use chrono::{DateTime, Duration, FixedOffset};

use super::station::Station;

/// All stations to render, unique by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub stations: Vec<Station>,
    pub last_update: DateTime<FixedOffset>,
}

impl DisplaySnapshot {
    /// Look up a station by exact name.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// Shift the snapshot forward by the display's refresh latency.
    ///
    /// `last_update` moves forward by `offset_mins` and every countdown moves
    /// back by the same amount. Departures that would be in the past are
    /// dropped, then lines without departures, then stations with nothing
    /// left to show.
    pub fn with_render_offset(mut self, offset_mins: u32) -> Self {
        if offset_mins == 0 {
            return self;
        }

        self.last_update += Duration::minutes(i64::from(offset_mins));

        for station in &mut self.stations {
            for line in &mut station.lines {
                line.departures = line
                    .departures
                    .iter()
                    .filter_map(|d| d.checked_sub(offset_mins))
                    .collect();
            }
            station.lines.retain(|l| !l.departures.is_empty());
        }
        self.stations.retain(|s| !s.is_empty());

        self
    }
}
