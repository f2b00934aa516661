//! ÖBB ticket shop API DTOs.
//!
//! Request bodies mirror what the web shop sends; response types keep only
//! the fields the board needs.

use serde::{Deserialize, Serialize};

/// Response from `api/domain/v3/init`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub access_token: String,
    pub session_id: String,
    pub support_id: String,

    /// Session lifetime in seconds.
    pub session_timeout: u64,
}

/// Body for `api/hafas/v4/timetable`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest {
    pub reverse: bool,

    /// Local time formatted as `%Y-%m-%dT%H:%M:%S.000Z`.
    pub datetime_departure: String,

    pub filter: TimetableFilter,
    pub passengers: Vec<Passenger>,
    pub count: u32,
    pub from: StationNumber,
    pub to: StationNumber,
}

impl TimetableRequest {
    /// A request for the next `count` connections, one adult, no filters.
    pub fn new(from: u64, to: u64, datetime_departure: String, count: u32) -> Self {
        Self {
            reverse: false,
            datetime_departure,
            filter: TimetableFilter::default(),
            passengers: vec![Passenger::adult()],
            count,
            from: StationNumber { number: from },
            to: StationNumber { number: to },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableFilter {
    pub regionaltrains: bool,
    pub direct: bool,
    pub change_time: bool,
    pub wheelchair: bool,
    pub bikes: bool,
    pub trains: bool,
    pub motorail: bool,
    pub dropped_connections: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    #[serde(rename = "type")]
    pub kind: String,
    pub me: bool,
    pub remembered: bool,
    pub challenged_flags: ChallengedFlags,
    pub relations: Vec<serde_json::Value>,
    pub cards: Vec<serde_json::Value>,
    pub birthdate_changeable: bool,
    pub birthdate_deletable: bool,
    pub name_changeable: bool,
    pub passenger_deletable: bool,
}

impl Passenger {
    pub fn adult() -> Self {
        Self {
            kind: "ADULT".to_string(),
            me: false,
            remembered: false,
            challenged_flags: ChallengedFlags::default(),
            relations: Vec::new(),
            cards: Vec::new(),
            birthdate_changeable: true,
            birthdate_deletable: true,
            name_changeable: true,
            passenger_deletable: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengedFlags {
    pub has_handicapped_pass: bool,
    pub has_assistance_dog: bool,
    pub has_wheelchair: bool,
    pub has_attendant: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StationNumber {
    pub number: u64,
}

/// Response from `api/hafas/v4/timetable`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    #[serde(default)]
    pub connections: Vec<TimetableConnection>,
}

/// One journey option between the requested stations.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableConnection {
    /// Number of changes; zero for a direct train.
    #[serde(default)]
    pub switches: u32,

    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub from: SectionStop,
    pub to: SectionStop,
    pub category: Category,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStop {
    pub name: String,

    /// Scheduled time, e.g. `2019-03-03T12:40:00.000`.
    pub departure: Option<String>,

    /// Expected time; only present when the train runs late.
    pub departure_delay: Option<String>,
}

/// Train category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category letter, e.g. `"S"` or `"R"`.
    pub name: String,

    /// Short label shown on the board.
    pub short_name: String,

    /// Contains `"disabled"` for step-free trains.
    #[serde(default)]
    pub journey_preview_icon_id: String,
}
