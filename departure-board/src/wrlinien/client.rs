//! Wiener Linien realtime monitor HTTP client.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::config::WrLinienConfig;
use crate::domain::{Rename, TransitBoard};
use crate::source::http::{build_client, parse_json, read_body};
use crate::source::{Provider, ProviderError, SourceId, retry_once};

use super::convert::convert_monitor;
use super::types::MonitorResponse;

/// Client for `ogd_realtime/monitor`.
///
/// One request covers every configured RBL (stop point) id.
#[derive(Debug, Clone)]
pub struct WrLinienClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    rbls: String,
    renames: Vec<Rename>,
}

impl WrLinienClient {
    /// Create a client from the `api.wrlinien` section.
    pub fn new(config: &WrLinienConfig) -> Result<Self, ProviderError> {
        let http = build_client(Duration::from_secs(config.timeout_secs), HeaderMap::new())?;

        let rbls = config
            .rbls
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            rbls,
            renames: config.rename.clone(),
        })
    }

    async fn fetch_monitor(&self) -> Result<MonitorResponse, ProviderError> {
        let url = &format!("{}/ogd_realtime/monitor", self.base_url);

        // The API key travels in the query string.
        retry_once(SourceId::WrLinien, move || async move {
            let response = self
                .http
                .get(url)
                .query(&[("rbl", self.rbls.as_str()), ("sender", self.key.as_str())])
                .send()
                .await
                .map_err(|e| ProviderError::from(e).without_url())?;
            let body = read_body(response).await.map_err(ProviderError::without_url)?;
            parse_json::<MonitorResponse>(&body)
        })
        .await
    }

    /// Fetch the monitor and convert it into a transit board.
    pub async fn get_board(&self) -> Result<TransitBoard, ProviderError> {
        let response = self.fetch_monitor().await?;
        let board = convert_monitor(&response, &self.renames)?;
        debug!(stations = board.stations.len(), "Converted monitor response");
        Ok(board)
    }
}

impl Provider for WrLinienClient {
    type Output = TransitBoard;

    fn source(&self) -> SourceId {
        SourceId::WrLinien
    }

    fn fetch(&self) -> BoxFuture<'_, Result<TransitBoard, ProviderError>> {
        Box::pin(self.get_board())
    }
    fn redact(&self, text: &str) -> String {
        crate::error::redact(text, std::slice::from_ref(&self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(key: &str) -> WrLinienClient {
        let config: WrLinienConfig = serde_json::from_str(&format!(
            r#"{{"updateInterval": 30, "key": "{key}", "rbls": [4205, 4210]}}"#
        ))
        .unwrap();
        WrLinienClient::new(&config).unwrap()
    }

    #[test]
    fn joins_rbls_for_one_request() {
        assert_eq!(client("k").rbls, "4205,4210");
    }

    #[test]
    fn redacts_the_api_key() {
        let client = client("s3cr3t");
        assert_eq!(
            Provider::redact(&client, "GET /ogd_realtime/monitor?sender=s3cr3t"),
            "GET /ogd_realtime/monitor?sender=[REDACTED]"
        );
    }

    #[test]
    fn empty_key_redacts_nothing() {
        assert_eq!(Provider::redact(&client(""), "sender="), "sender=");
    }
}
