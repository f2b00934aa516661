//! The cycle controller: refresh, aggregate, render, show, sleep.
//!
//! Failures are classified by [`FailureKind`] and local hour. Inside the
//! quiet hours every failure only backs off. Outside them the adapters are
//! reset and the cycle retried until one kind reaches the failure
//! threshold, at which point an error screen is shown and the controller
//! stops.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, Timelike};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::aggregate::aggregate;
use crate::config::{AppConfig, RecoveryConfig};
use crate::display::DisplayDriver;
use crate::error::{AppError, FailureKind, redact};
use crate::render::Renderer;
use crate::sources::Sources;

/// Source of local wall-clock time.
pub trait Clock: Send {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// What the controller does after a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Quiet hours: sleep and rerun without resetting or counting.
    QuietBackoff(Duration),
    /// Reset every adapter, sleep and rerun.
    Reset { occurrence: u32, backoff: Duration },
    /// Show the error screen and stop.
    Fatal { occurrence: u32 },
}

/// Per-kind failure counting.
#[derive(Debug, Clone)]
pub struct RecoveryPolicy {
    quiet_hours: RangeInclusive<u32>,
    threshold: u32,
    reset_backoff: Duration,
    quiet_backoff: Duration,
    occurrences: HashMap<FailureKind, u32>,
}

impl RecoveryPolicy {
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            quiet_hours: config.quiet_hours.range(),
            threshold: config.failure_threshold,
            reset_backoff: config.reset_backoff(),
            quiet_backoff: config.quiet_backoff(),
            occurrences: HashMap::new(),
        }
    }

    /// Record a failure of `kind` that happened in local hour `hour`.
    pub fn on_failure(&mut self, kind: FailureKind, hour: u32) -> Recovery {
        if self.quiet_hours.contains(&hour) {
            return Recovery::QuietBackoff(self.quiet_backoff);
        }

        let count = self.occurrences.entry(kind).or_insert(0);
        *count += 1;
        let occurrence = *count;

        if occurrence >= self.threshold {
            Recovery::Fatal { occurrence }
        } else {
            Recovery::Reset {
                occurrence,
                backoff: self.reset_backoff,
            }
        }
    }

    /// A cycle succeeded; forget earlier failures.
    pub fn on_success(&mut self) {
        self.occurrences.clear();
    }

    /// How often `kind` has failed since the last successful cycle.
    pub fn occurrences(&self, kind: FailureKind) -> u32 {
        self.occurrences.get(&kind).copied().unwrap_or(0)
    }
}

/// Outcome of one [`CycleController::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The board was updated; the controller slept this long afterwards.
    Waited(Duration),
    /// The cycle failed and was recovered from.
    Recovered(Recovery),
}

/// Drives the refresh cycle.
pub struct CycleController<R, D> {
    config: Arc<AppConfig>,
    sources: Sources,
    renderer: R,
    display: D,
    clock: Box<dyn Clock>,
    policy: RecoveryPolicy,
}

impl<R: Renderer, D: DisplayDriver> CycleController<R, D> {
    pub fn new(config: Arc<AppConfig>, sources: Sources, renderer: R, display: D) -> Self {
        let policy = RecoveryPolicy::new(&config.recovery);
        Self {
            config,
            sources,
            renderer,
            display,
            clock: Box::new(SystemClock),
            policy,
        }
    }

    /// Replace the wall clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn policy(&self) -> &RecoveryPolicy {
        &self.policy
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Run cycles until one fails fatally, and return that failure.
    pub async fn run(&mut self) -> AppError {
        info!(
            interval_secs = self.config.display.update_interval,
            "Starting departure board"
        );
        loop {
            if let Err(e) = self.step().await {
                return e;
            }
        }
    }

    /// Run one cycle and the sleep or recovery that follows it.
    pub async fn step(&mut self) -> Result<Transition, AppError> {
        let started = Instant::now();

        match self.run_cycle().await {
            Ok(()) => {
                self.policy.on_success();
                let wait = self.next_wait(started.elapsed());
                tokio::time::sleep(wait).await;
                Ok(Transition::Waited(wait))
            }
            Err(e) => {
                let kind = e.kind();
                let message = self.redacted(&e.to_string());
                let recovery = self.policy.on_failure(kind, self.clock.now().hour());

                match recovery {
                    Recovery::QuietBackoff(backoff) => {
                        warn!(
                            kind = %kind,
                            error = %message,
                            backoff_secs = backoff.as_secs(),
                            "Cycle failed during quiet hours, backing off"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    Recovery::Reset {
                        occurrence,
                        backoff,
                    } => {
                        warn!(
                            kind = %kind,
                            occurrence,
                            error = %message,
                            "Cycle failed, resetting sources"
                        );
                        self.sources.reset_all();
                        tokio::time::sleep(backoff).await;
                    }
                    Recovery::Fatal { occurrence } => {
                        error!(
                            kind = %kind,
                            occurrence,
                            error = %message,
                            "Failure repeated too often, giving up"
                        );
                        self.show_failure(&e);
                        return Err(e);
                    }
                }

                Ok(Transition::Recovered(recovery))
            }
        }
    }

    async fn run_cycle(&mut self) -> Result<(), AppError> {
        self.sources.refresh_all(Instant::now()).await?;

        let mut snapshot = aggregate(
            &self.sources.aggregate_input(),
            &self.config.stations.walking_time,
            self.clock.now(),
        )?;
        if let Some(offset) = self.config.display.render_offset {
            snapshot = snapshot.with_render_offset(offset);
        }

        let frame = self.renderer.render(&snapshot, self.sources.weather());
        self.display.show(&frame)?;

        info!(stations = snapshot.stations.len(), "Board updated");
        Ok(())
    }

    fn next_wait(&self, elapsed: Duration) -> Duration {
        let interval = self.config.display.update_interval();
        match interval.checked_sub(elapsed) {
            Some(wait) => {
                debug!(wait_secs = wait.as_secs(), "Sleeping until next cycle");
                wait
            }
            None => {
                warn!(
                    late_by_ms = (elapsed - interval).as_millis() as u64,
                    "Cycle overran the update interval, starting next cycle now"
                );
                Duration::ZERO
            }
        }
    }

    /// Show the error screen for a fatal failure, with secrets removed.
    fn show_failure(&mut self, err: &AppError) {
        let mut lines = err.detail_lines().into_iter().map(|l| self.redacted(&l));
        let message = lines.next().unwrap_or_default();
        let details: Vec<String> = lines.collect();

        let frame = self.renderer.render_error(&message, err.kind(), &details);
        if let Err(e) = self.display.show(&frame) {
            error!(error = %e, "Failed to show error screen");
        }
    }

    fn redacted(&self, text: &str) -> String {
        redact(text, &self.config.secrets())
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
