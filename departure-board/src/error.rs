//! Application error types and failure classification.
//!
//! Every error carries a [`FailureKind`] tag. The cycle controller counts
//! repeated failures per kind, never per message.

use std::error::Error as _;
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::display::DisplayError;
use crate::source::{ProviderError, SourceId};

/// Marker that replaces configured secrets in user-visible error text.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Coarse classification of a failure, used by the recovery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network or HTTP fault.
    Fetch,
    /// Malformed provider payload.
    Parse,
    /// A required source never produced data.
    NoData,
    /// A provider reported an application-level failure (e.g. bad API key).
    Provider,
    /// Rendering or display output failed.
    Display,
    /// Configuration could not be loaded.
    Config,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Fetch => "FetchError",
            FailureKind::Parse => "ParseError",
            FailureKind::NoData => "NoDataError",
            FailureKind::Provider => "ProviderError",
            FailureKind::Display => "DisplayError",
            FailureKind::Config => "ConfigError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level application errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required source has not produced any data yet
    #[error("{0} API data is missing, check the log for the failed fetch")]
    NoData(SourceId),

    /// An adapter's fetch failed
    #[error("{source_id}: {error}")]
    Source {
        source_id: SourceId,
        #[source]
        error: Arc<ProviderError>,
    },

    /// Showing a frame failed
    #[error("display error: {0}")]
    Display(#[from] DisplayError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// The failure kind used by the recovery policy.
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::NoData(_) => FailureKind::NoData,
            AppError::Source { error, .. } => error.kind(),
            AppError::Display(_) => FailureKind::Display,
            AppError::Config(_) => FailureKind::Config,
        }
    }

    /// The error followed by its `source()` chain, one entry per cause.
    ///
    /// A cause whose text the line before it already shows is skipped.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![self.to_string()];
        let mut shown = lines[0].clone();
        let mut cause = self.source();
        while let Some(err) = cause {
            let text = err.to_string();
            if !shown.contains(&text) {
                lines.push(format!("caused by: {text}"));
            }
            shown = text;
            cause = err.source();
        }
        lines
    }
}

/// Replace every non-empty secret in `text` with [`REDACTION_MARKER`].
pub fn redact(text: &str, secrets: &[String]) -> String {
    secrets
        .iter()
        .filter(|s| !s.is_empty())
        .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), REDACTION_MARKER))
}
