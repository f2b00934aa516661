//! Concurrent refresh of every active source.

use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::source::{Refresh, Refreshed};

/// Refresh all adapters concurrently and wait for every one to finish.
///
/// Returns the first failure in registration order. Later failures are
/// logged; their errors stay captured on their adapters.
pub async fn refresh_all(adapters: Vec<&mut dyn Refresh>, now: Instant) -> Result<(), AppError> {
    let futures: Vec<_> = adapters
        .into_iter()
        .map(|adapter| async move {
            let source = adapter.source();
            (source, adapter.refresh(now).await)
        })
        .collect();

    let results = join_all(futures).await;

    let mut fetched = 0;
    let mut first_error = None;
    for (source, result) in results {
        match result {
            Ok(Refreshed::Fetched) => fetched += 1,
            Ok(Refreshed::Skipped) => {}
            Err(e) if first_error.is_none() => first_error = Some(e),
            // The adapter already logged the error text.
            Err(e) => warn!(source = %source, kind = %e.kind(), "Additional source failed this cycle"),
        }
    }

    debug!(fetched, failed = first_error.is_some(), "Refreshed sources");

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
