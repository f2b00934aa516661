//! Conversion from the station feed to bike-share info.

use crate::config::BikeStationFilter;
use crate::domain::BikeStationInfo;
use crate::source::ConversionError;

use super::types::{StationList, StationXml};

/// Keep the configured stations, in feed order, applying per-id renames.
pub fn convert_stations(
    list: &StationList,
    filters: &[BikeStationFilter],
) -> Result<Vec<BikeStationInfo>, ConversionError> {
    list.stations
        .iter()
        .filter_map(|station| {
            let filter = filters
                .iter()
                .find(|f| f.id.to_string() == station.id.trim())?;
            Some(convert_station(station, filter))
        })
        .collect()
}

fn convert_station(
    station: &StationXml,
    filter: &BikeStationFilter,
) -> Result<BikeStationInfo, ConversionError> {
    let bike_count = station
        .free_bikes
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidNumber {
            field: "free_bikes",
            value: station.free_bikes.clone(),
        })?;

    Ok(BikeStationInfo {
        id: station.id.trim().to_string(),
        name: filter
            .rename
            .clone()
            .unwrap_or_else(|| station.name.trim().to_string()),
        status: station.status.trim().to_string(),
        bike_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::http::parse_xml;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <stations>
            <station>
                <id>2004</id>
                <internal_id>1058</internal_id>
                <name>Traisengasse U6</name>
                <boxes>20</boxes>
                <free_boxes>20</free_boxes>
                <free_bikes>0</free_bikes>
                <status>aktiv</status>
            </station>
            <station>
                <id>2005</id>
                <name>Handelskai</name>
                <free_bikes>2</free_bikes>
                <status>aktiv</status>
            </station>
            <station>
                <id>108</id>
                <name>Friedensbrücke</name>
                <free_bikes>7</free_bikes>
                <status>aktiv</status>
            </station>
        </stations>"#;

    fn filter(id: u32, rename: Option<&str>) -> BikeStationFilter {
        BikeStationFilter {
            id,
            rename: rename.map(str::to_string),
        }
    }

    #[test]
    fn keeps_only_configured_stations() {
        let list: StationList = parse_xml(FEED).unwrap();
        let filters = [filter(2005, None), filter(2004, None)];

        let stations = convert_stations(&list, &filters).unwrap();
        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2004", "2005"]);
        assert_eq!(stations[1].name, "Handelskai");
        assert_eq!(stations[1].bike_count, 2);
        assert_eq!(stations[1].status, "aktiv");
    }

    #[test]
    fn rename_replaces_provider_name() {
        let list: StationList = parse_xml(FEED).unwrap();
        let filters = [filter(2004, Some("Traisengasse"))];

        let stations = convert_stations(&list, &filters).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Traisengasse");
        assert_eq!(stations[0].bike_count, 0);
    }

    #[test]
    fn non_numeric_bike_count_is_error() {
        let feed = "<stations><station><id>1</id><name>A</name>\
                    <free_bikes>n/a</free_bikes><status>aktiv</status></station></stations>";
        let list: StationList = parse_xml(feed).unwrap();

        let err = convert_stations(&list, &[filter(1, None)]).unwrap_err();
        assert_eq!(
            err,
            ConversionError::InvalidNumber {
                field: "free_bikes",
                value: "n/a".into()
            }
        );
    }

    #[test]
    fn unconfigured_bad_station_is_ignored() {
        let feed = "<stations><station><id>1</id><name>A</name>\
                    <free_bikes>n/a</free_bikes></station></stations>";
        let list: StationList = parse_xml(feed).unwrap();

        assert!(convert_stations(&list, &[filter(2, None)]).unwrap().is_empty());
    }
}
