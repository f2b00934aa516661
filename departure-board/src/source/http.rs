//! HTTP helpers shared by the provider clients.

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use super::error::ProviderError;

/// How much of a bad body to keep for the error message.
const BODY_SNIPPET_CHARS: usize = 500;

/// Build a client with default headers and a request timeout.
pub(crate) fn build_client(
    timeout: Duration,
    headers: HeaderMap,
) -> Result<reqwest::Client, ProviderError> {
    let http = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    Ok(http)
}

/// Check the status and read the body as text.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            status: status.as_u16(),
            message: body.chars().take(BODY_SNIPPET_CHARS).collect(),
        });
    }

    Ok(response.text().await?)
}

/// Deserialize a JSON body, keeping a snippet of it on failure.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
    })
}

/// Deserialize an XML body.
pub(crate) fn parse_xml<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    quick_xml::de::from_str(body).map_err(|e| ProviderError::Xml(e.to_string()))
}
