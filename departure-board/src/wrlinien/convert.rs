//! Conversion from monitor DTOs to domain types.

use chrono::{DateTime, FixedOffset};

use crate::domain::{Line, Rename, Station, TransitBoard, apply_renames, merge_stations_by_name};
use crate::source::{ConversionError, ProviderError};

use super::types::{MonitorLine, MonitorResponse};

/// Server time format, e.g. `2019-03-03T12:40:20.025+0100`.
const SERVER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Convert a monitor response into a transit board.
///
/// Fails with [`ProviderError::Api`] when the server did not answer `OK`.
pub fn convert_monitor(
    response: &MonitorResponse,
    renames: &[Rename],
) -> Result<TransitBoard, ProviderError> {
    if response.message.value != "OK" {
        return Err(ProviderError::Api(format!(
            "API returns {} (code {}), check the message and the API key",
            response.message.value,
            response
                .message
                .message_code
                .map_or_else(|| "none".to_string(), |c| c.to_string()),
        )));
    }

    let last_update = parse_server_time(response.message.server_time.as_deref())?;

    let monitors = response
        .data
        .as_ref()
        .map(|d| d.monitors.as_slice())
        .unwrap_or(&[]);

    let mut stations: Vec<Station> = monitors
        .iter()
        .map(|monitor| {
            Station::new(
                monitor.location_stop.properties.title.clone(),
                monitor.lines.iter().map(convert_line).collect(),
            )
        })
        .collect();

    apply_renames(&mut stations, renames);

    Ok(TransitBoard {
        stations: merge_stations_by_name(stations),
        last_update,
    })
}

fn convert_line(line: &MonitorLine) -> Line {
    let departures = line
        .departures
        .departure
        .iter()
        .filter_map(|d| d.departure_time.as_ref()?.countdown)
        .map(|countdown| u32::try_from(countdown.max(0)).unwrap_or(u32::MAX))
        .collect();

    Line::new(&line.name, line.towards.clone(), departures)
        .with_barrier_free(line.barrier_free)
        .with_delayed(line.trafficjam)
}

fn parse_server_time(value: Option<&str>) -> Result<DateTime<FixedOffset>, ConversionError> {
    let value = value.ok_or(ConversionError::MissingField("message.serverTime"))?;
    DateTime::parse_from_str(value, SERVER_TIME_FORMAT)
        .map_err(|_| ConversionError::InvalidTime(value.to_string()))
}
