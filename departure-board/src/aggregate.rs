//! Builds the display snapshot from the adapters' cached data.

use chrono::{DateTime, FixedOffset};

use crate::config::WalkingTime;
use crate::domain::{
    BikeStationInfo, DisplaySnapshot, Station, TransitBoard, collapse_lines, merge_stations_by_name,
};
use crate::error::AppError;
use crate::source::SourceId;

/// Cached data of one source as seen by the aggregator.
#[derive(Debug)]
pub enum SourceData<'a, T> {
    /// The source is not configured and contributes nothing.
    Disabled,
    /// The source is configured but has never fetched successfully.
    Missing,
    Ready(&'a T),
}

impl<'a, T> SourceData<'a, T> {
    /// `Disabled` unless configured, otherwise `Ready` or `Missing` by cache state.
    pub fn from_cache(configured: bool, cached: Option<&'a T>) -> Self {
        match (configured, cached) {
            (false, _) => SourceData::Disabled,
            (true, None) => SourceData::Missing,
            (true, Some(data)) => SourceData::Ready(data),
        }
    }

    fn require(&self, source: SourceId) -> Result<Option<&'a T>, AppError> {
        match *self {
            SourceData::Disabled => Ok(None),
            SourceData::Missing => Err(AppError::NoData(source)),
            SourceData::Ready(data) => Ok(Some(data)),
        }
    }
}

/// Everything the aggregator reads.
#[derive(Debug)]
pub struct AggregateInput<'a> {
    pub transit: SourceData<'a, TransitBoard>,
    pub trains: SourceData<'a, Vec<Station>>,
    pub bikes: SourceData<'a, Vec<BikeStationInfo>>,
}

/// Merge transit, train and bike data into one snapshot.
///
/// Fails with [`AppError::NoData`] before merging if a configured source has
/// no data. `lastUpdate` is the transit server's time when available, else
/// `now`.
pub fn aggregate(
    input: &AggregateInput<'_>,
    walking_times: &[WalkingTime],
    now: DateTime<FixedOffset>,
) -> Result<DisplaySnapshot, AppError> {
    let transit = input.transit.require(SourceId::WrLinien)?;
    let trains = input.trains.require(SourceId::Oebb)?;
    let bikes = input.bikes.require(SourceId::Citybike)?;

    let transit_stations = transit.into_iter().flat_map(|board| board.stations.iter());
    let train_stations = trains.into_iter().flatten();
    let mut stations = merge_stations_by_name(transit_stations.chain(train_stations).cloned());

    for bike in bikes.into_iter().flatten() {
        match stations.iter_mut().find(|s| s.name == bike.name) {
            Some(station) => station.bike_share = Some(bike.clone()),
            None => stations.push(Station::bike_only(bike.clone())),
        }
    }

    for station in &mut stations {
        if let Some(entry) = walking_times.iter().find(|w| w.station == station.name) {
            station.walking_time = Some(entry.time);
        }
    }

    collapse_lines(&mut stations);

    Ok(DisplaySnapshot {
        stations,
        last_update: transit.map_or(now, |board| board.last_update),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, Rename};

    fn last_update() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2019-03-03T12:40:20+01:00").unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2019-03-03T12:41:00+01:00").unwrap()
    }

    fn transit() -> TransitBoard {
        TransitBoard {
            stations: vec![Station::new(
                "Traisengasse",
                vec![Line::new("2", "Dornbach", vec![15, 45])],
            )],
            last_update: last_update(),
        }
    }

    fn trains() -> Vec<Station> {
        vec![Station::new(
            "Traisengasse",
            vec![Line::new("S", "Dornbach", vec![5])],
        )]
    }

    fn bike(name: &str, count: u32) -> BikeStationInfo {
        BikeStationInfo {
            id: "2004".into(),
            name: name.into(),
            status: "aktiv".into(),
            bike_count: count,
        }
    }

    fn walking(station: &str, time: u32) -> WalkingTime {
        WalkingTime {
            station: station.into(),
            time,
        }
    }

    #[test]
    fn same_station_and_direction_collapse_across_sources() {
        let transit = transit();
        let trains = trains();
        let bikes = Vec::new();
        let input = AggregateInput {
            transit: SourceData::Ready(&transit),
            trains: SourceData::Ready(&trains),
            bikes: SourceData::Ready(&bikes),
        };

        let snapshot = aggregate(&input, &[], now()).unwrap();

        assert_eq!(snapshot.stations.len(), 1);
        let station = &snapshot.stations[0];
        assert_eq!(station.name, "Traisengasse");
        assert_eq!(station.lines.len(), 1);
        assert_eq!(station.lines[0].direction, "Dornbach");
        assert_eq!(station.lines[0].departures, vec![5, 15, 45]);
        assert_eq!(snapshot.last_update, last_update());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let transit = transit();
        let trains = trains();
        let bikes = vec![bike("Handelskai", 3)];
        let input = AggregateInput {
            transit: SourceData::Ready(&transit),
            trains: SourceData::Ready(&trains),
            bikes: SourceData::Ready(&bikes),
        };
        let walking_times = [walking("Traisengasse", 4)];

        let first = aggregate(&input, &walking_times, now()).unwrap();
        let second = aggregate(&input, &walking_times, now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn renamed_train_station_merges_into_transit_station() {
        let transit = transit();
        let trains = crate::oebb::normalize(
            vec![Station::new(
                "Wien Traisengasse",
                vec![Line::new("S", "nach Meidling", vec![2])],
            )],
            &[Rename::new("Wien Traisengasse", "Traisengasse")],
        );
        let input = AggregateInput {
            transit: SourceData::Ready(&transit),
            trains: SourceData::Ready(&trains),
            bikes: SourceData::Disabled,
        };

        let snapshot = aggregate(&input, &[], now()).unwrap();
        assert_eq!(snapshot.stations.len(), 1);
        assert_eq!(snapshot.stations[0].lines.len(), 2);
    }

    #[test]
    fn bikes_attach_or_add_station() {
        let transit = transit();
        let bikes = vec![bike("Traisengasse", 0), bike("Handelskai", 3)];
        let input = AggregateInput {
            transit: SourceData::Ready(&transit),
            trains: SourceData::Disabled,
            bikes: SourceData::Ready(&bikes),
        };

        let snapshot = aggregate(&input, &[], now()).unwrap();
        assert_eq!(snapshot.stations.len(), 2);

        let traisengasse = snapshot.station("Traisengasse").unwrap();
        assert_eq!(traisengasse.bike_share.as_ref().unwrap().bike_count, 0);
        assert_eq!(traisengasse.lines.len(), 1);

        let handelskai = snapshot.station("Handelskai").unwrap();
        assert!(handelskai.lines.is_empty());
        assert_eq!(handelskai.bike_share.as_ref().unwrap().bike_count, 3);
    }

    #[test]
    fn walking_time_only_on_exact_match() {
        let transit = TransitBoard {
            stations: vec![
                Station::new("Traisengasse", vec![Line::new("2", "Dornbach", vec![4])]),
                Station::new("Handelskai", vec![Line::new("S", "nach Floridsdorf", vec![8])]),
            ],
            last_update: last_update(),
        };
        let input = AggregateInput {
            transit: SourceData::Ready(&transit),
            trains: SourceData::Disabled,
            bikes: SourceData::Disabled,
        };
        let walking_times = [walking("Traisengasse", 4), walking("handelskai", 9)];

        let snapshot = aggregate(&input, &walking_times, now()).unwrap();
        assert_eq!(snapshot.station("Traisengasse").unwrap().walking_time, Some(4));
        assert_eq!(snapshot.station("Handelskai").unwrap().walking_time, None);
    }

    #[test]
    fn missing_required_source_is_no_data() {
        let transit = transit();
        let input = AggregateInput {
            transit: SourceData::Ready(&transit),
            trains: SourceData::Missing,
            bikes: SourceData::Disabled,
        };

        let err = aggregate(&input, &[], now()).unwrap_err();
        assert!(matches!(err, AppError::NoData(SourceId::Oebb)));
    }

    #[test]
    fn without_transit_last_update_is_now() {
        let trains = trains();
        let input = AggregateInput {
            transit: SourceData::Disabled,
            trains: SourceData::Ready(&trains),
            bikes: SourceData::Disabled,
        };

        let snapshot = aggregate(&input, &[], now()).unwrap();
        assert_eq!(snapshot.last_update, now());
        assert_eq!(snapshot.stations[0].lines[0].name, "  S");
    }

    #[test]
    fn from_cache_distinguishes_disabled_and_missing() {
        let data = 1;
        assert!(matches!(SourceData::<u32>::from_cache(false, None), SourceData::Disabled));
        assert!(matches!(SourceData::<u32>::from_cache(true, None), SourceData::Missing));
        assert!(matches!(SourceData::from_cache(true, Some(&data)), SourceData::Ready(&1)));
    }
}
