//! Data sources and their per-source adapters.
//!
//! A [`Provider`] knows how to fetch and normalize one external API. An
//! [`Adapter`] wraps a provider with the last good result, a fetch timer and
//! the last captured error.

mod adapter;
mod error;
pub(crate) mod http;
mod retry;

use std::fmt;

use futures::future::BoxFuture;

pub use adapter::{Adapter, Refresh, Refreshed};
pub use error::{ConversionError, ProviderError};
pub use retry::retry_once;

/// Identifies an external data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// Wiener Linien realtime monitor (transit lines).
    WrLinien,
    /// ÖBB timetable (trains).
    Oebb,
    /// Citybike Wien (bike share).
    Citybike,
    /// yr.no forecast (weather).
    Yrno,
}

impl SourceId {
    /// Human-readable name, used in logs and on the error screen.
    pub fn name(self) -> &'static str {
        match self {
            SourceId::WrLinien => "Wiener Linien",
            SourceId::Oebb => "ÖBB",
            SourceId::Citybike => "Citybike Wien",
            SourceId::Yrno => "yr.no",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetches and normalizes data from one external source.
///
/// This abstraction allows adapters and the cycle controller to be tested
/// with scripted data instead of HTTP.
pub trait Provider: Send + Sync {
    /// The normalized result type.
    type Output: Send;

    /// Which source this provider talks to.
    fn source(&self) -> SourceId;

    /// Fetch from the source and normalize the payload.
    fn fetch(&self) -> BoxFuture<'_, Result<Self::Output, ProviderError>>;

    /// Drop any provider-held state such as sessions.
    fn reset(&self) {}

    /// Remove this provider's credentials from text about to be logged.
    fn redact(&self, text: &str) -> String {
        text.to_string()
    }
}
