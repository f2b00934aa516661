//! Single immediate retry for transient transport faults.

use std::future::Future;

use tracing::warn;

use super::SourceId;
use super::error::ProviderError;

/// Run `op`, retrying exactly once if the first attempt failed in transport.
///
/// Non-transient failures (bad status, unauthorized, parse errors) are
/// returned immediately.
pub async fn retry_once<T, F, Fut>(source: SourceId, mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    match op().await {
        Err(e) if e.is_transient() => {
            warn!(source = %source, error = %e, "Transient fetch failure, retrying once");
            op().await
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn transport_error() -> ProviderError {
        ProviderError::Http(reqwest::Client::new().get("not a url").build().unwrap_err())
    }

    #[tokio::test]
    async fn retries_transient_once_then_succeeds() {
        let calls = &AtomicUsize::new(0);
        let result = retry_once(SourceId::WrLinien, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(transport_error())
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_second_transient_failure() {
        let calls = &AtomicUsize::new(0);
        let result: Result<u32, _> = retry_once(SourceId::Oebb, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transport_error())
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Http(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_non_transient() {
        let calls = &AtomicUsize::new(0);
        let result: Result<u32, _> = retry_once(SourceId::Citybike, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Unauthorized)
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Unauthorized)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
