//! Wiener Linien realtime monitor DTOs.
//!
//! These types map directly to the `ogd_realtime/monitor` JSON response.
//! Unused fields are left out; serde ignores them.

use serde::Deserialize;

/// Response from `ogd_realtime/monitor`.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorResponse {
    /// Absent when the server rejects the request.
    pub data: Option<MonitorData>,

    /// Status of the request.
    pub message: Message,
}

/// Request status block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// `"OK"` on success.
    pub value: String,

    /// Numeric status code.
    pub message_code: Option<i64>,

    /// Server timestamp, e.g. `2019-03-03T12:40:20.025+0100`.
    pub server_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorData {
    #[serde(default)]
    pub monitors: Vec<Monitor>,
}

/// One stop point (RBL) with its lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub location_stop: LocationStop,

    #[serde(default)]
    pub lines: Vec<MonitorLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationStop {
    pub properties: StopProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopProperties {
    /// Display name of the stop, e.g. `"Traisengasse"`.
    pub title: String,
}

/// A line serving the stop in one direction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorLine {
    /// Line code, e.g. `"2"` or `"11A"`.
    pub name: String,

    /// Destination label.
    pub towards: String,

    #[serde(default)]
    pub barrier_free: bool,

    /// Whether the line is stuck in traffic.
    #[serde(default)]
    pub trafficjam: bool,

    #[serde(default)]
    pub departures: Departures,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Departures {
    #[serde(default)]
    pub departure: Vec<Departure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub departure_time: Option<DepartureTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureTime {
    /// Minutes until departure.
    pub countdown: Option<i64>,
    pub time_planned: Option<String>,
    pub time_real: Option<String>,
}
