//! Application configuration.
//!
//! Loaded once from a JSON file into an immutable [`AppConfig`] that is
//! shared as `Arc<AppConfig>`. [`ConfigFile::reload`] produces a new
//! snapshot instead of mutating the old one.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::Rename;

/// Environment variable that overrides the Wiener Linien API key.
pub const WRLINIEN_KEY_ENV: &str = "WRLINIEN_KEY";

/// Default HTTP timeout for provider requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the expected schema
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Config parsed but a value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root of `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    #[serde(default)]
    pub stations: StationsConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
}

/// Per-source sections. A source is active iff its section is present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub wrlinien: Option<WrLinienConfig>,
    pub oebb: Option<OebbConfig>,
    pub citybikewien: Option<CitybikeConfig>,
    pub yrno: Option<YrnoConfig>,
}

/// Wiener Linien realtime monitor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrLinienConfig {
    /// Minimum seconds between fetches.
    pub update_interval: u64,
    /// API key, sent as the `sender` parameter.
    #[serde(default)]
    pub key: String,
    /// Stop point ids to monitor.
    pub rbls: Vec<u32>,
    #[serde(default)]
    pub rename: Vec<Rename>,
    #[serde(default = "default_wrlinien_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// A train connection of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Connection {
    /// Departure station number.
    pub from: u64,
    /// Destination station number.
    pub to: u64,
}

/// ÖBB timetable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OebbConfig {
    pub update_interval: u64,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub rename: Vec<Rename>,
    #[serde(default = "default_oebb_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// A bike station of interest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BikeStationFilter {
    pub id: u32,
    /// Replaces the provider's name so the station merges with transit data.
    pub rename: Option<String>,
}

/// Citybike Wien.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitybikeConfig {
    pub update_interval: u64,
    pub stations: Vec<BikeStationFilter>,
    #[serde(default = "default_citybike_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// yr.no forecast location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YrnoConfig {
    pub update_interval: u64,
    pub country: String,
    pub province: String,
    pub city: String,
    #[serde(default = "default_yrno_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Display refresh and layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    /// Seconds between cycles.
    pub update_interval: u64,
    /// Minutes the panel takes to refresh; subtracted from countdowns.
    pub render_offset: Option<u32>,
    #[serde(default = "default_title")]
    pub title: String,
    /// Directory the preview display writes frames to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Walking time from home to a station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalkingTime {
    pub station: String,
    /// Minutes.
    pub time: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsConfig {
    #[serde(default)]
    pub walking_time: Vec<WalkingTime>,
    /// Minutes one is willing to wait at the stop after walking there.
    #[serde(default = "default_avg_waiting_time")]
    pub avg_waiting_time: u32,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            walking_time: Vec::new(),
            avg_waiting_time: default_avg_waiting_time(),
        }
    }
}

/// Inclusive range of local hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuietHours {
    pub start: u32,
    pub end: u32,
}

impl QuietHours {
    pub fn range(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// Failure-recovery policy. Omitted fields take their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecoveryConfig {
    /// Hours in which failures only back off.
    pub quiet_hours: QuietHours,
    /// Occurrence count of one failure kind that ends the process.
    pub failure_threshold: u32,
    pub reset_backoff_secs: u64,
    pub quiet_backoff_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            quiet_hours: QuietHours { start: 1, end: 5 },
            failure_threshold: 3,
            reset_backoff_secs: 2,
            quiet_backoff_secs: 60 * 60,
        }
    }
}

impl RecoveryConfig {
    pub fn reset_backoff(&self) -> Duration {
        Duration::from_secs(self.reset_backoff_secs)
    }

    pub fn quiet_backoff(&self) -> Duration {
        Duration::from_secs(self.quiet_backoff_secs)
    }
}

fn default_wrlinien_url() -> String {
    "https://www.wienerlinien.at".to_string()
}

fn default_oebb_url() -> String {
    "https://tickets.oebb.at".to_string()
}

fn default_citybike_url() -> String {
    "http://dynamisch.citybikewien.at/citybike_xml.php".to_string()
}

fn default_yrno_url() -> String {
    "https://www.yr.no".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_title() -> String {
    "Abfahrten".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("preview")
}

fn default_avg_waiting_time() -> u32 {
    3
}

impl AppConfig {
    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the Wiener Linien key when `key` is given.
    pub fn with_wrlinien_key(mut self, key: Option<String>) -> Self {
        if let (Some(key), Some(wrlinien)) = (key, self.api.wrlinien.as_mut()) {
            wrlinien.key = key;
        }
        self
    }

    /// Values that must never reach the screen.
    pub fn secrets(&self) -> Vec<String> {
        self.api
            .wrlinien
            .iter()
            .map(|w| w.key.clone())
            .filter(|k| !k.is_empty())
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("display.updateInterval", Some(self.display.update_interval)),
            (
                "api.wrlinien.updateInterval",
                self.api.wrlinien.as_ref().map(|c| c.update_interval),
            ),
            (
                "api.oebb.updateInterval",
                self.api.oebb.as_ref().map(|c| c.update_interval),
            ),
            (
                "api.citybikewien.updateInterval",
                self.api.citybikewien.as_ref().map(|c| c.update_interval),
            ),
            (
                "api.yrno.updateInterval",
                self.api.yrno.as_ref().map(|c| c.update_interval),
            ),
        ];
        for (name, value) in intervals {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("{name} must be greater than 0")));
            }
        }

        if self.recovery.failure_threshold == 0 {
            return Err(ConfigError::Invalid(
                "recovery.failureThreshold must be at least 1".to_string(),
            ));
        }

        let QuietHours { start, end } = self.recovery.quiet_hours;
        if start > 23 || end > 23 || start > end {
            return Err(ConfigError::Invalid(format!(
                "recovery.quietHours {start}..={end} is not a range of hours"
            )));
        }

        Ok(())
    }
}

impl DisplayConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval)
    }
}

/// A config file on disk and the snapshot last loaded from it.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    current: Arc<AppConfig>,
}

impl ConfigFile {
    /// Load the config at `path`, applying the environment key override.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let current = Arc::new(read(&path)?);
        Ok(Self { path, current })
    }

    /// The snapshot last loaded.
    pub fn current(&self) -> Arc<AppConfig> {
        Arc::clone(&self.current)
    }

    /// Re-read the file into a new snapshot.
    ///
    /// On failure the previous snapshot stays current.
    pub fn reload(&mut self) -> Result<Arc<AppConfig>, ConfigError> {
        self.current = Arc::new(read(&self.path)?);
        Ok(self.current())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read(path: &Path) -> Result<AppConfig, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = AppConfig::from_json(&json)?;
    Ok(config.with_wrlinien_key(std::env::var(WRLINIEN_KEY_ENV).ok()))
}
