//! Startup initialization state machine.
//!
//! The service cannot answer queries until a non-empty airport dataset has
//! been loaded, but the store file and the `airports` table are produced by
//! an external ingestion job that may start after us. The supervisor
//! therefore drives a bounded retry loop through two phases:
//!
//! `Connecting` -> `AwaitingData` -> `Ready`, with either phase falling to
//! `Failed` once its attempt budget is exhausted. There is no automatic
//! recovery from `Failed`; the operator restarts the process.
//!
//! Retry intervals and attempt counts are injectable so tests can run the
//! machine with zero-delay retries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::store::{self, AirportDataset};

/// Phase of the initialization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// Attempting to open a connection to the backing store.
    Connecting,
    /// Connected; waiting for the `airports` table to be populated.
    AwaitingData,
    /// A non-empty dataset snapshot has been loaded.
    Ready,
    /// A retry budget was exhausted; restart-only recovery.
    Failed,
}

/// Bounded retry configuration for both initialization phases.
///
/// Defaults match the deployment the service was written for: the store
/// connection gets 10 attempts 5 seconds apart, and the data wait gets a
/// larger budget of 20 attempts because the ingestion job is expected to
/// still be running when the service starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub connect_attempts: u32,
    pub connect_delay: Duration,
    pub data_attempts: u32,
    pub data_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            connect_attempts: 10,
            connect_delay: Duration::from_secs(5),
            data_attempts: 20,
            data_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy for exercising the state machine in tests.
    pub fn immediate(connect_attempts: u32, data_attempts: u32) -> Self {
        Self {
            connect_attempts,
            connect_delay: Duration::ZERO,
            data_attempts,
            data_delay: Duration::ZERO,
        }
    }
}

/// Drives initialization to completion exactly once per process.
#[derive(Debug)]
pub struct Supervisor {
    store_path: PathBuf,
    policy: RetryPolicy,
    state: InitState,
}

impl Supervisor {
    pub fn new(store_path: impl Into<PathBuf>, policy: RetryPolicy) -> Self {
        Self {
            store_path: store_path.into(),
            policy,
            state: InitState::Connecting,
        }
    }

    /// Current phase of the machine.
    pub fn state(&self) -> InitState {
        self.state
    }

    /// Path of the backing store this supervisor connects to.
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Run the state machine to completion.
    ///
    /// Returns the loaded dataset snapshot on success. On failure the
    /// machine is left in `Failed` and the error names the phase that
    /// exhausted its budget.
    ///
    /// Store access happens on the blocking pool; only the store path and
    /// the machine's own state live across the retry sleeps, so the
    /// returned future is `Send` and can run on a spawned task.
    pub async fn run(&mut self) -> Result<AirportDataset> {
        self.connect().await?;
        self.await_data().await
    }

    async fn connect(&mut self) -> Result<()> {
        self.state = InitState::Connecting;

        for attempt in 1..=self.policy.connect_attempts {
            match self.check_store().await {
                Ok(()) => {
                    info!(
                        attempt,
                        path = %self.store_path.display(),
                        "store connection established"
                    );
                    self.state = InitState::AwaitingData;
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.connect_attempts,
                        error = %e,
                        "store connection failed"
                    );
                    if attempt < self.policy.connect_attempts {
                        tokio::time::sleep(self.policy.connect_delay).await;
                    }
                }
            }
        }

        self.state = InitState::Failed;
        Err(Error::InitTimedOut {
            phase: "connecting",
            attempts: self.policy.connect_attempts,
        })
    }

    async fn await_data(&mut self) -> Result<AirportDataset> {
        for attempt in 1..=self.policy.data_attempts {
            match self.poll_dataset().await {
                Ok(Some(dataset)) => {
                    info!(count = dataset.len(), "airport dataset loaded");
                    self.state = InitState::Ready;
                    return Ok(dataset);
                }
                Ok(None) => {
                    info!(
                        attempt,
                        max_attempts = self.policy.data_attempts,
                        "airports table is empty, waiting for ingestion"
                    );
                }
                Err(e) => {
                    // The table may not exist yet while ingestion races us.
                    warn!(
                        attempt,
                        max_attempts = self.policy.data_attempts,
                        error = %e,
                        "could not load airports table"
                    );
                }
            }

            if attempt < self.policy.data_attempts {
                tokio::time::sleep(self.policy.data_delay).await;
            }
        }

        self.state = InitState::Failed;
        Err(Error::InitTimedOut {
            phase: "awaiting data",
            attempts: self.policy.data_attempts,
        })
    }

    /// Open and ping the store on the blocking pool, dropping the
    /// connection immediately; each data poll re-opens its own.
    async fn check_store(&self) -> Result<()> {
        let path = self.store_path.clone();
        tokio::task::spawn_blocking(move || store::open_store(&path).map(drop))
            .await
            .map_err(|e| Error::DataUnavailable {
                reason: format!("store check task failed: {e}"),
            })?
    }

    /// One data-wait attempt on the blocking pool.
    ///
    /// Returns `Ok(None)` while the table exists but holds no rows.
    /// Counting first keeps the common polling path cheap; the full load
    /// only runs once rows exist.
    async fn poll_dataset(&self) -> Result<Option<AirportDataset>> {
        let path = self.store_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store::open_store(&path)?;
            if store::count_airports(&conn)? > 0 {
                store::load_airports(&conn).map(Some)
            } else {
                Ok(None)
            }
        })
        .await
        .map_err(|e| Error::DataUnavailable {
            reason: format!("data poll task failed: {e}"),
        })?
    }
}
