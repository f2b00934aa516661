//! yr.no `forecast.xml` DTOs.
//!
//! Attribute values are kept as strings and parsed during conversion so a
//! malformed number reports which field it came from.

use serde::Deserialize;

/// The `<weatherdata>` document root.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherData {
    pub location: Location,
    pub credit: CreditXml,
    pub meta: Meta,
    pub sun: Sun,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditXml {
    pub link: Link,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    #[serde(rename = "@text")]
    pub text: String,
    #[serde(rename = "@url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    /// When the forecast was produced, local time.
    pub lastupdate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sun {
    #[serde(rename = "@rise")]
    pub rise: String,
    #[serde(rename = "@set")]
    pub set: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub tabular: Tabular,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tabular {
    #[serde(rename = "time", default)]
    pub periods: Vec<Period>,
}

/// One `<time from=".." to="..">` forecast period.
#[derive(Debug, Clone, Deserialize)]
pub struct Period {
    #[serde(rename = "@from")]
    pub from: String,
    #[serde(rename = "@to")]
    pub to: String,

    pub symbol: SymbolXml,
    pub precipitation: ValueAttr,
    #[serde(rename = "windDirection")]
    pub wind_direction: WindDirection,
    #[serde(rename = "windSpeed")]
    pub wind_speed: WindSpeed,
    pub temperature: ValueAttr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolXml {
    #[serde(rename = "@number")]
    pub number: String,
    #[serde(rename = "@name")]
    pub name: String,
}

/// An element whose only payload is a `value` attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueAttr {
    #[serde(rename = "@value")]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindDirection {
    #[serde(rename = "@code")]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindSpeed {
    #[serde(rename = "@mps")]
    pub mps: String,
    #[serde(rename = "@name")]
    pub name: String,
}
