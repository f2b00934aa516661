//! yr.no forecast HTTP client.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::config::YrnoConfig;
use crate::domain::WeatherSnapshot;
use crate::source::http::{build_client, parse_xml, read_body};
use crate::source::{Provider, ProviderError, SourceId, retry_once};

use super::convert::convert_forecast;
use super::types::WeatherData;

/// Client for one location's `forecast.xml`.
#[derive(Debug, Clone)]
pub struct YrnoClient {
    http: reqwest::Client,
    url: String,
}

impl YrnoClient {
    pub fn new(config: &YrnoConfig) -> Result<Self, ProviderError> {
        let http = build_client(Duration::from_secs(config.timeout_secs), HeaderMap::new())?;

        let url = format!(
            "{}/place/{}/{}/{}/forecast.xml",
            config.base_url.trim_end_matches('/'),
            config.country,
            config.province,
            config.city
        );

        Ok(Self { http, url })
    }

    pub async fn get_forecast(&self) -> Result<WeatherSnapshot, ProviderError> {
        let data: WeatherData = retry_once(SourceId::Yrno, move || async move {
            let response = self.http.get(self.url.as_str()).send().await?;
            let body = read_body(response).await?;
            parse_xml::<WeatherData>(&body)
        })
        .await?;

        let weather = convert_forecast(&data)?;
        debug!(
            city = %weather.city,
            periods = weather.forecast.len(),
            "Converted forecast"
        );
        Ok(weather)
    }
}

impl Provider for YrnoClient {
    type Output = WeatherSnapshot;

    fn source(&self) -> SourceId {
        SourceId::Yrno
    }

    fn fetch(&self) -> BoxFuture<'_, Result<WeatherSnapshot, ProviderError>> {
        Box::pin(self.get_forecast())
    }
}
