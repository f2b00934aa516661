//! Conversion from timetable DTOs to stations.

use chrono::NaiveDateTime;

use crate::domain::{Line, Rename, Station, apply_renames, merge_lines_by_direction, merge_stations_by_name};
use crate::source::ConversionError;

use super::types::TimetableConnection;

/// Timetable timestamps, e.g. `2019-03-03T12:40:00.000`. A trailing `Z` is
/// ignored; the API reports local time.
const TIMETABLE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Categories kept on the board: S-Bahn and regional trains.
const TRAIN_CATEGORIES: [&str; 2] = ["s", "r"];

/// Convert the connections of one timetable query into single-line stations.
///
/// Stops at the first connection that needs a change; later results are
/// only further away. Categories other than S and R are skipped.
pub fn convert_connections(
    connections: &[TimetableConnection],
    now: NaiveDateTime,
) -> Result<Vec<Station>, ConversionError> {
    let mut stations = Vec::new();

    for connection in connections {
        if connection.switches > 0 {
            break;
        }

        let section = connection
            .sections
            .first()
            .ok_or(ConversionError::MissingField("connections[].sections"))?;

        let category = section.category.name.to_lowercase();
        if !TRAIN_CATEGORIES.contains(&category.as_str()) {
            continue;
        }

        let delayed = section.from.departure_delay.is_some();
        let departure = section
            .from
            .departure_delay
            .as_deref()
            .or(section.from.departure.as_deref())
            .ok_or(ConversionError::MissingField("sections[].from.departure"))?;

        let line = Line::new(
            &section.category.short_name,
            section.to.name.clone(),
            vec![countdown_minutes(parse_time(departure)?, now)],
        )
        .with_barrier_free(section.category.journey_preview_icon_id.contains("disabled"))
        .with_delayed(delayed);

        stations.push(Station::new(section.from.name.clone(), vec![line]));
    }

    Ok(stations)
}

/// Rename, merge stations by name, then merge lines by direction.
pub fn normalize(mut stations: Vec<Station>, renames: &[Rename]) -> Vec<Station> {
    apply_renames(&mut stations, renames);
    merge_stations_by_name(stations)
        .into_iter()
        .map(|mut station| {
            station.lines = merge_lines_by_direction(std::mem::take(&mut station.lines));
            station
        })
        .collect()
}

fn parse_time(value: &str) -> Result<NaiveDateTime, ConversionError> {
    NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), TIMETABLE_TIME_FORMAT)
        .map_err(|_| ConversionError::InvalidTime(value.to_string()))
}

/// Whole minutes from `now` until `departure`, rounded, never negative.
fn countdown_minutes(departure: NaiveDateTime, now: NaiveDateTime) -> u32 {
    let minutes = (departure - now).num_seconds() as f64 / 60.0;
    minutes.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oebb::types::TimetableResponse;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2019-03-03T12:40:00", "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn connection(category: &str, from: &str, to: &str, departure: &str, delay: Option<&str>) -> String {
        let delay = delay
            .map(|d| format!(r#", "departureDelay": "{d}""#))
            .unwrap_or_default();
        format!(
            r#"{{
                "switches": 0,
                "sections": [{{
                    "from": {{"name": "{from}", "departure": "{departure}"{delay}}},
                    "to": {{"name": "{to}"}},
                    "category": {{"name": "{category}", "shortName": "{category}",
                                  "journeyPreviewIconId": "journey_preview_disabled"}}
                }}]
            }}"#
        )
    }

    fn parse(connections: &[String]) -> Vec<TimetableConnection> {
        let json = format!(r#"{{"connections": [{}]}}"#, connections.join(","));
        serde_json::from_str::<TimetableResponse>(&json)
            .unwrap()
            .connections
    }

    #[test]
    fn direct_s_bahn_becomes_station_line() {
        let connections = parse(&[connection(
            "S",
            "Traisengasse",
            "nach Meidling",
            "2019-03-03T12:42:00.000",
            None,
        )]);

        let stations = convert_connections(&connections, now()).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Traisengasse");

        let line = &stations[0].lines[0];
        assert_eq!(line.name, "  S");
        assert_eq!(line.direction, "nach Meidling");
        assert_eq!(line.departures, vec![2]);
        assert!(line.barrier_free);
        assert!(!line.delayed);
    }

    #[test]
    fn delayed_train_counts_down_to_expected_time() {
        let connections = parse(&[connection(
            "R",
            "Handelskai",
            "nach Floridsdorf",
            "2019-03-03T12:45:00.000",
            Some("2019-03-03T12:51:30.000"),
        )]);

        let stations = convert_connections(&connections, now()).unwrap();
        let line = &stations[0].lines[0];
        assert!(line.delayed);
        assert_eq!(line.departures, vec![12]);
    }

    #[test]
    fn departed_train_clamps_to_zero() {
        let connections = parse(&[connection(
            "S",
            "Traisengasse",
            "nach Meidling",
            "2019-03-03T12:38:00.000Z",
            None,
        )]);

        let stations = convert_connections(&connections, now()).unwrap();
        assert_eq!(stations[0].lines[0].departures, vec![0]);
    }

    #[test]
    fn other_categories_are_skipped() {
        let connections = parse(&[
            connection("RJ", "Wien Hbf", "nach Graz", "2019-03-03T12:50:00.000", None),
            connection("S", "Traisengasse", "nach Meidling", "2019-03-03T12:42:00.000", None),
        ]);

        let stations = convert_connections(&connections, now()).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Traisengasse");
    }

    #[test]
    fn stops_at_first_connection_with_changes() {
        let with_change = connection("S", "Traisengasse", "nach Meidling", "2019-03-03T12:44:00.000", None)
            .replacen(r#""switches": 0"#, r#""switches": 1"#, 1);
        let connections = parse(&[
            connection("S", "Traisengasse", "nach Meidling", "2019-03-03T12:42:00.000", None),
            with_change,
            connection("S", "Traisengasse", "nach Meidling", "2019-03-03T12:55:00.000", None),
        ]);

        let stations = convert_connections(&connections, now()).unwrap();
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn malformed_departure_is_conversion_error() {
        let connections = parse(&[connection("S", "Traisengasse", "nach Meidling", "soon", None)]);

        let err = convert_connections(&connections, now()).unwrap_err();
        assert_eq!(err, ConversionError::InvalidTime("soon".to_string()));
    }

    #[test]
    fn normalize_renames_then_merges() {
        let stations = vec![
            Station::new("Wien Traisengasse", vec![Line::new("S", "Wien Meidling", vec![14])]),
            Station::new("Traisengasse", vec![Line::new("S", "nach Meidling", vec![2])]),
            Station::new("Traisengasse", vec![Line::new("S", "nach Flughafen", vec![8])]),
        ];
        let renames = [
            Rename::new("Wien Traisengasse", "Traisengasse"),
            Rename::new("Wien Meidling", "nach Meidling"),
        ];

        let stations = normalize(stations, &renames);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].lines.len(), 2);
        assert_eq!(stations[0].lines[0].direction, "nach Meidling");
        assert_eq!(stations[0].lines[0].departures, vec![2, 14]);
        assert_eq!(stations[0].lines[1].departures, vec![8]);
    }
}
