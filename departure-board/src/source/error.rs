//! Provider error types.

use crate::error::FailureKind;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Failed to parse a number
    #[error("invalid number in {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A value that must be sent back as a header is not header-safe
    #[error("invalid header value in {0}")]
    InvalidHeader(&'static str),
}

/// Errors from fetching or normalizing provider data.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// The provider answered but reported an application-level failure
    #[error("API reported failure: {0}")]
    Api(String),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// XML deserialization failed
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Payload parsed but could not be normalized
    #[error("invalid payload: {0}")]
    Convert(#[from] ConversionError),
}

impl ProviderError {
    /// The failure kind used by the recovery policy.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Http(_) | ProviderError::Status { .. } => FailureKind::Fetch,
            ProviderError::Unauthorized | ProviderError::Api(_) => FailureKind::Provider,
            ProviderError::Json { .. } | ProviderError::Xml(_) | ProviderError::Convert(_) => {
                FailureKind::Parse
            }
        }
    }

    /// Whether the fault happened in transport and is worth one immediate retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Http(e) if !e.is_status())
    }

    /// Drop the request URL from transport errors. Used where the URL
    /// carries a credential.
    pub fn without_url(self) -> Self {
        match self {
            ProviderError::Http(e) => ProviderError::Http(e.without_url()),
            other => other,
        }
    }
}
