//! Weather forecast types.

use chrono::NaiveDateTime;

/// A normalized weather forecast for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    /// Forecast periods in chronological order.
    pub forecast: Vec<ForecastEntry>,
    pub credit: Credit,
    pub last_update: NaiveDateTime,
}

impl WeatherSnapshot {
    /// Whether `now` falls outside daylight.
    pub fn is_night(&self, now: NaiveDateTime) -> bool {
        now < self.sunrise || now > self.sunset
    }
}

/// One forecast period.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub celsius: i32,
    pub precipitation_mm: f32,
    pub wind: Wind,
    pub symbol: Symbol,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wind {
    /// Compass code, e.g. `"WNW"`.
    pub direction: String,
    pub mps: f32,
    /// Beaufort description, e.g. `"Gentle breeze"`.
    pub description: String,
}

impl Wind {
    /// Wind speed in km/h, rounded.
    pub fn kmh(&self) -> u32 {
        (self.mps * 3.6).round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: u32,
    pub description: String,
}

/// Attribution required by the weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    pub text: String,
    pub url: String,
}
