//! Citybike Wien HTTP client.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::config::{BikeStationFilter, CitybikeConfig};
use crate::domain::BikeStationInfo;
use crate::source::http::{build_client, parse_xml, read_body};
use crate::source::{Provider, ProviderError, SourceId, retry_once};

use super::convert::convert_stations;
use super::types::StationList;

/// Client for the station feed. The feed lists every station in the city.
#[derive(Debug, Clone)]
pub struct CitybikeClient {
    http: reqwest::Client,
    url: String,
    filters: Vec<BikeStationFilter>,
}

impl CitybikeClient {
    pub fn new(config: &CitybikeConfig) -> Result<Self, ProviderError> {
        let http = build_client(Duration::from_secs(config.timeout_secs), HeaderMap::new())?;

        Ok(Self {
            http,
            url: config.url.clone(),
            filters: config.stations.clone(),
        })
    }

    /// Fetch the feed and keep the configured stations.
    pub async fn get_stations(&self) -> Result<Vec<BikeStationInfo>, ProviderError> {
        let list: StationList = retry_once(SourceId::Citybike, move || async move {
            let response = self.http.get(self.url.as_str()).send().await?;
            let body = read_body(response).await?;
            parse_xml::<StationList>(&body)
        })
        .await?;

        let stations = convert_stations(&list, &self.filters)?;
        debug!(
            listed = list.stations.len(),
            kept = stations.len(),
            "Filtered bike stations"
        );
        Ok(stations)
    }
}

impl Provider for CitybikeClient {
    type Output = Vec<BikeStationInfo>;

    fn source(&self) -> SourceId {
        SourceId::Citybike
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<BikeStationInfo>, ProviderError>> {
        Box::pin(self.get_stations())
    }
}
