//! Production lifecycle state machine and polling loop
//!
//! The state machine is a pure transition function, independent of timers,
//! so it can be unit-tested without real waiting. The loop itself is generic
//! over a [`StatusSource`] so tests can inject scripted status sequences and
//! drive the clock with tokio's paused time.

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::types::{ProductionStatus, StatusCode};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Forward-only lifecycle state of the watched production
///
/// `Succeeded` and `Failed` are absorbing: once reached, no status code
/// moves the state anywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    /// Job still queued or running; keep polling
    InProgress,
    /// Terminal success; output files are available
    Succeeded,
    /// Terminal failure reported by the server
    Failed,
}

impl PollState {
    /// Advance the state given a freshly observed status code.
    ///
    /// Unrecognized codes keep the job in progress rather than failing the
    /// run: the remote API may introduce new codes, and availability wins
    /// over strictness here. The caller is expected to log the anomaly.
    pub fn advance(self, code: StatusCode) -> PollState {
        match self {
            PollState::Succeeded | PollState::Failed => self,
            PollState::InProgress => match code {
                StatusCode::Done => PollState::Succeeded,
                StatusCode::Error => PollState::Failed,
                StatusCode::Waiting
                | StatusCode::Processing
                | StatusCode::AudioProcessing
                | StatusCode::Unknown(_) => PollState::InProgress,
            },
        }
    }
}

/// Terminal result of a completed polling loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The production reached the done status
    Completed,
    /// The production reached the error status
    Failed,
}

/// Timing policy for the polling loop
#[derive(Clone, Copy, Debug)]
pub struct PollTiming {
    /// Pause before the first poll, letting the start command propagate
    pub initial_delay: Duration,
    /// Fixed spacing between polls
    pub interval: Duration,
    /// Wall-clock budget; exceeding it aborts the loop
    pub max_wait: Duration,
}

impl PollTiming {
    /// Extract the polling-related fields from the runtime config.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            initial_delay: config.initial_poll_delay,
            interval: config.poll_interval,
            max_wait: config.max_wait,
        }
    }
}

/// Source of production status observations
///
/// Implemented by the live API client and by scripted sequences in tests.
#[async_trait]
pub trait StatusSource {
    /// Fetch the next status observation.
    ///
    /// Transport-level failures are fatal for the run; the loop does not
    /// retry them.
    async fn poll_status(&mut self) -> Result<ProductionStatus>;
}

/// Live status source polling one production through the API client
pub struct ProductionStatusSource<'a> {
    client: &'a ApiClient,
    uuid: &'a str,
}

impl<'a> ProductionStatusSource<'a> {
    /// Create a source polling the given production.
    pub fn new(client: &'a ApiClient, uuid: &'a str) -> Self {
        Self { client, uuid }
    }
}

#[async_trait]
impl StatusSource for ProductionStatusSource<'_> {
    async fn poll_status(&mut self) -> Result<ProductionStatus> {
        self.client.get_status(self.uuid).await
    }
}

/// Poll until the production reaches a terminal state or the budget runs out.
///
/// Sleeps `initial_delay` once, then polls at `interval`. The wall clock is
/// measured from entry, so the initial delay counts against `max_wait`.
/// `status_url` is the human status page included in the timeout error.
pub async fn wait_for_done<S>(
    source: &mut S,
    timing: &PollTiming,
    status_url: &str,
) -> Result<PollOutcome>
where
    S: StatusSource + Send,
{
    let started = Instant::now();
    let mut state = PollState::InProgress;

    tokio::time::sleep(timing.initial_delay).await;

    loop {
        let observed = source.poll_status().await?;
        let code = observed.status;
        info!(
            status = %code,
            code = code.code(),
            status_string = observed.status_string.as_deref().unwrap_or(""),
            "production status"
        );
        if let StatusCode::Unknown(raw) = code {
            warn!(code = raw, "unknown status code, continuing to wait");
        }

        state = state.advance(code);
        match state {
            PollState::Succeeded => {
                info!("processing complete");
                return Ok(PollOutcome::Completed);
            }
            PollState::Failed => return Ok(PollOutcome::Failed),
            PollState::InProgress => {}
        }

        let waited = started.elapsed();
        if waited > timing.max_wait {
            return Err(Error::Timeout {
                waited,
                status_url: status_url.to_string(),
            });
        }
        tokio::time::sleep(timing.interval).await;
    }
}
