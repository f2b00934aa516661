//! Citybike Wien station feed DTOs (`citybike_xml.php`).

use serde::Deserialize;

/// The `<stations>` document root.
#[derive(Debug, Clone, Deserialize)]
pub struct StationList {
    #[serde(rename = "station", default)]
    pub stations: Vec<StationXml>,
}

/// One `<station>` element. All values arrive as element text.
#[derive(Debug, Clone, Deserialize)]
pub struct StationXml {
    pub id: String,
    pub name: String,
    pub free_bikes: String,
    #[serde(default)]
    pub status: String,
}
