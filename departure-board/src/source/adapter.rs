//! Per-source adapter: cached result, fetch timer and captured error.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::AppError;

use super::error::ProviderError;
use super::{Provider, SourceId};

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refreshed {
    /// New data was fetched and cached.
    Fetched,
    /// The fetch timer has not elapsed; cached data was kept.
    Skipped,
}

/// Wraps a provider with its last good result and fetch schedule.
///
/// On failure the cached data and timer are left untouched so stale data
/// stays available; the error is both stored and returned.
pub struct Adapter<T> {
    provider: Box<dyn Provider<Output = T>>,
    update_interval: Duration,
    cached: Option<T>,
    next_fetch: Option<Instant>,
    last_error: Option<Arc<ProviderError>>,
}

impl<T: Send + 'static> Adapter<T> {
    /// Create an adapter that fetches at most once per `update_interval`.
    pub fn new(provider: impl Provider<Output = T> + 'static, update_interval: Duration) -> Self {
        Self {
            provider: Box::new(provider),
            update_interval,
            cached: None,
            next_fetch: None,
            last_error: None,
        }
    }

    /// The last successfully fetched data.
    pub fn data(&self) -> Option<&T> {
        self.cached.as_ref()
    }

    /// The error captured by the last failed refresh.
    pub fn last_error(&self) -> Option<&ProviderError> {
        self.last_error.as_deref()
    }

    /// Whether a refresh at `now` would fetch.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_fetch.is_none_or(|next| now >= next)
    }

    /// When the next fetch is allowed, if a fetch has succeeded.
    pub fn next_fetch(&self) -> Option<Instant> {
        self.next_fetch
    }

    /// Error text safe to log.
    fn describe(&self, error: &ProviderError) -> String {
        self.provider.redact(&error.to_string())
    }

    async fn refresh_at(&mut self, now: Instant) -> Result<Refreshed, AppError> {
        let source = self.provider.source();

        if !self.is_due(now) {
            debug!(source = %source, "Fetch timer not elapsed, keeping cached data");
            return Ok(Refreshed::Skipped);
        }

        match self.provider.fetch().await {
            Ok(data) => {
                self.cached = Some(data);
                self.next_fetch = Some(Instant::now() + self.update_interval);
                self.last_error = None;
                info!(source = %source, "Retrieved data");
                Ok(Refreshed::Fetched)
            }
            Err(e) => {
                warn!(
                    source = %source,
                    error = %self.describe(&e),
                    "Fetch failed, keeping cached data"
                );
                let error = Arc::new(e);
                self.last_error = Some(Arc::clone(&error));
                Err(AppError::Source {
                    source_id: source,
                    error,
                })
            }
        }
    }
}

/// Type-erased adapter interface used by the scheduler's fan-out.
pub trait Refresh: Send {
    /// Which source the adapter wraps.
    fn source(&self) -> SourceId;

    /// Fetch if the timer allows, updating the cache on success.
    fn refresh(&mut self, now: Instant) -> BoxFuture<'_, Result<Refreshed, AppError>>;

    /// Clear cached data, captured error and fetch timer.
    fn reset(&mut self);
}

impl<T: Send + 'static> Refresh for Adapter<T> {
    fn source(&self) -> SourceId {
        self.provider.source()
    }

    fn refresh(&mut self, now: Instant) -> BoxFuture<'_, Result<Refreshed, AppError>> {
        Box::pin(self.refresh_at(now))
    }

    fn reset(&mut self) {
        self.cached = None;
        self.next_fetch = None;
        self.last_error = None;
        self.provider.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        results: Mutex<VecDeque<Result<u32, ProviderError>>>,
        calls: Arc<AtomicUsize>,
        resets: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(results: Vec<Result<u32, ProviderError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Arc::new(AtomicUsize::new(0)),
                resets: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Provider for Scripted {
        type Output = u32;

        fn source(&self) -> SourceId {
            SourceId::WrLinien
        }

        fn fetch(&self) -> BoxFuture<'_, Result<u32, ProviderError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProviderError::Api("script exhausted".into())));
            Box::pin(async move { next })
        }

        fn reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct KeyedProvider;

    impl Provider for KeyedProvider {
        type Output = u32;

        fn source(&self) -> SourceId {
            SourceId::WrLinien
        }

        fn fetch(&self) -> BoxFuture<'_, Result<u32, ProviderError>> {
            Box::pin(async { Err(ProviderError::Api("sender k3y rejected".into())) })
        }

        fn redact(&self, text: &str) -> String {
            text.replace("k3y", "[REDACTED]")
        }
    }

    fn unavailable() -> ProviderError {
        ProviderError::Status {
            status: 503,
            message: "down".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_once_per_interval() {
        let provider = Scripted::new(vec![Ok(1), Ok(2)]);
        let calls = Arc::clone(&provider.calls);
        let mut adapter = Adapter::new(provider, Duration::from_secs(60));

        assert_eq!(adapter.refresh(Instant::now()).await.unwrap(), Refreshed::Fetched);
        assert_eq!(adapter.data(), Some(&1));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(adapter.refresh(Instant::now()).await.unwrap(), Refreshed::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(adapter.refresh(Instant::now()).await.unwrap(), Refreshed::Fetched);
        assert_eq!(adapter.data(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_stale_data_and_timer() {
        let mut adapter = Adapter::new(Scripted::new(vec![Ok(7), Err(unavailable())]), Duration::ZERO);

        adapter.refresh(Instant::now()).await.unwrap();
        let next = adapter.next_fetch();

        let err = adapter.refresh(Instant::now()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Source {
                source_id: SourceId::WrLinien,
                ..
            }
        ));
        assert_eq!(adapter.data(), Some(&7));
        assert_eq!(adapter.next_fetch(), next);
        assert!(matches!(
            adapter.last_error(),
            Some(ProviderError::Status { status: 503, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_captured_error() {
        let mut adapter = Adapter::new(Scripted::new(vec![Err(unavailable()), Ok(3)]), Duration::ZERO);

        assert!(adapter.refresh(Instant::now()).await.is_err());
        assert!(adapter.last_error().is_some());
        assert!(adapter.data().is_none());

        adapter.refresh(Instant::now()).await.unwrap();
        assert!(adapter.last_error().is_none());
        assert_eq!(adapter.data(), Some(&3));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_forces_refetch() {
        let provider = Scripted::new(vec![Ok(1), Ok(2)]);
        let calls = Arc::clone(&provider.calls);
        let resets = Arc::clone(&provider.resets);
        let mut adapter = Adapter::new(provider, Duration::from_secs(3600));

        adapter.refresh(Instant::now()).await.unwrap();
        adapter.reset();

        assert!(adapter.data().is_none());
        assert!(adapter.next_fetch().is_none());
        assert!(adapter.is_due(Instant::now()));
        assert_eq!(resets.load(Ordering::SeqCst), 1);

        adapter.refresh(Instant::now()).await.unwrap();
        assert_eq!(adapter.data(), Some(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn logged_error_text_is_redacted_by_provider() {
        let mut adapter = Adapter::new(KeyedProvider, Duration::from_secs(60));
        assert!(adapter.refresh(Instant::now()).await.is_err());

        let captured = adapter.last_error().unwrap();
        assert_eq!(
            adapter.describe(captured),
            "API reported failure: sender [REDACTED] rejected"
        );
    }
}
