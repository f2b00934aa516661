//! The set of configured sources and their adapters.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::aggregate::{AggregateInput, SourceData};
use crate::citybike::CitybikeClient;
use crate::config::ApiConfig;
use crate::domain::{BikeStationInfo, Station, TransitBoard, WeatherSnapshot};
use crate::error::AppError;
use crate::oebb::OebbClient;
use crate::scheduler;
use crate::source::{Adapter, Provider, ProviderError, Refresh};
use crate::wrlinien::WrLinienClient;
use crate::yrno::YrnoClient;

/// One optional adapter per source kind. A source is active iff configured.
#[derive(Default)]
pub struct Sources {
    transit: Option<Adapter<TransitBoard>>,
    trains: Option<Adapter<Vec<Station>>>,
    bikes: Option<Adapter<Vec<BikeStationInfo>>>,
    weather: Option<Adapter<WeatherSnapshot>>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an adapter for every configured section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ProviderError> {
        let mut sources = Self::new();

        if let Some(c) = &config.wrlinien {
            if c.key.is_empty() {
                warn!("Wiener Linien key is empty, requests will be rejected");
            }
            sources = sources.with_transit(WrLinienClient::new(c)?, secs(c.update_interval));
        }
        if let Some(c) = &config.oebb {
            sources = sources.with_trains(OebbClient::new(c)?, secs(c.update_interval));
        }
        if let Some(c) = &config.citybikewien {
            sources = sources.with_bikes(CitybikeClient::new(c)?, secs(c.update_interval));
        }
        if let Some(c) = &config.yrno {
            sources = sources.with_weather(YrnoClient::new(c)?, secs(c.update_interval));
        }

        info!(
            active = sources.active_count(),
            "Configured sources"
        );
        Ok(sources)
    }

    pub fn with_transit(
        mut self,
        provider: impl Provider<Output = TransitBoard> + 'static,
        interval: Duration,
    ) -> Self {
        self.transit = Some(Adapter::new(provider, interval));
        self
    }

    pub fn with_trains(
        mut self,
        provider: impl Provider<Output = Vec<Station>> + 'static,
        interval: Duration,
    ) -> Self {
        self.trains = Some(Adapter::new(provider, interval));
        self
    }

    pub fn with_bikes(
        mut self,
        provider: impl Provider<Output = Vec<BikeStationInfo>> + 'static,
        interval: Duration,
    ) -> Self {
        self.bikes = Some(Adapter::new(provider, interval));
        self
    }

    pub fn with_weather(
        mut self,
        provider: impl Provider<Output = WeatherSnapshot> + 'static,
        interval: Duration,
    ) -> Self {
        self.weather = Some(Adapter::new(provider, interval));
        self
    }

    /// Active adapters in registration order: transit, trains, bikes, weather.
    pub fn active_mut(&mut self) -> Vec<&mut dyn Refresh> {
        let mut active: Vec<&mut dyn Refresh> = Vec::new();
        if let Some(a) = self.transit.as_mut() {
            active.push(a);
        }
        if let Some(a) = self.trains.as_mut() {
            active.push(a);
        }
        if let Some(a) = self.bikes.as_mut() {
            active.push(a);
        }
        if let Some(a) = self.weather.as_mut() {
            active.push(a);
        }
        active
    }

    pub fn active_count(&self) -> usize {
        [
            self.transit.is_some(),
            self.trains.is_some(),
            self.bikes.is_some(),
            self.weather.is_some(),
        ]
        .into_iter()
        .filter(|&active| active)
        .count()
    }

    /// Refresh every active adapter concurrently.
    pub async fn refresh_all(&mut self, now: Instant) -> Result<(), AppError> {
        scheduler::refresh_all(self.active_mut(), now).await
    }

    /// Clear every adapter's cache, error and timer.
    pub fn reset_all(&mut self) {
        for adapter in self.active_mut() {
            adapter.reset();
        }
    }

    /// The latest forecast, if any.
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref().and_then(Adapter::data)
    }

    /// The cached data the aggregator needs.
    pub fn aggregate_input(&self) -> AggregateInput<'_> {
        AggregateInput {
            transit: source_data(self.transit.as_ref()),
            trains: source_data(self.trains.as_ref()),
            bikes: source_data(self.bikes.as_ref()),
        }
    }
}

fn source_data<T: Send + 'static>(adapter: Option<&Adapter<T>>) -> SourceData<'_, T> {
    SourceData::from_cache(adapter.is_some(), adapter.and_then(Adapter::data))
}

fn secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
