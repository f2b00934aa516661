//! Station and line merge rules.
//!
//! Stations are merged on exact (case-sensitive) name equality and lines on
//! exact direction equality. Renames run before any merge so a renamed
//! station joins the station it now shares a name with.

use std::collections::HashMap;

use serde::Deserialize;

use super::station::{Line, Station};

/// A configured `old → new` name override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rename {
    pub old: String,
    pub new: String,
}

impl Rename {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Apply rename entries, in order, to station names and line directions.
pub fn apply_renames(stations: &mut [Station], renames: &[Rename]) {
    for station in stations.iter_mut() {
        for rename in renames {
            for line in &mut station.lines {
                if line.direction == rename.old {
                    line.direction.clone_from(&rename.new);
                }
            }
            if station.name == rename.old {
                station.name.clone_from(&rename.new);
            }
        }
    }
}

/// Merge stations that share a name.
///
/// Lines are concatenated in input order; no line-level deduplication
/// happens here. The first station's position in the input is kept.
pub fn merge_stations_by_name(stations: impl IntoIterator<Item = Station>) -> Vec<Station> {
    let mut merged: Vec<Station> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for station in stations {
        match index.get(&station.name) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.lines.extend(station.lines);
                existing.walking_time = existing.walking_time.or(station.walking_time);
                if existing.bike_share.is_none() {
                    existing.bike_share = station.bike_share;
                }
            }
            None => {
                index.insert(station.name.clone(), merged.len());
                merged.push(station);
            }
        }
    }

    merged
}

/// Merge lines that share a direction.
///
/// The first line with a given direction keeps its name and step-free flag.
/// Departures are concatenated and sorted ascending with duplicates kept; the
/// merged line is delayed if any of its parts is.
pub fn merge_lines_by_direction(lines: Vec<Line>) -> Vec<Line> {
    let mut merged: Vec<Line> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        match index.get(&line.direction) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.departures.extend(line.departures);
                existing.delayed |= line.delayed;
            }
            None => {
                index.insert(line.direction.clone(), merged.len());
                merged.push(line);
            }
        }
    }

    for line in &mut merged {
        line.departures.sort_unstable();
    }

    merged
}

/// Collapse same-direction lines within every station.
pub fn collapse_lines(stations: &mut [Station]) {
    for station in stations.iter_mut() {
        let lines = std::mem::take(&mut station.lines);
        station.lines = merge_lines_by_direction(lines);
    }
}
