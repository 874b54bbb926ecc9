//! Application state for the airport atlas HTTP services.
//!
//! Holds the readiness flag and the published dataset snapshot. Both are
//! written exactly once, by the initialization supervisor, and read-only
//! afterward; the snapshot is published as a fully-built `Arc` so
//! concurrent readers never observe a half-updated dataset.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use airatlas_lib::AirportDataset;
use serde::{Deserialize, Serialize};

/// Service readiness, as reported by `/health` and `/status`.
///
/// Transitions are `Initializing -> Ready` (non-empty dataset published)
/// and `Initializing -> Failed` (retry budget exhausted). Neither `Ready`
/// nor `Failed` is ever left within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Initializing,
    Ready,
    Failed,
}

impl Readiness {
    /// Lowercase wire form used in status payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::Initializing => "initializing",
            Readiness::Ready => "ready",
            Readiness::Failed => "failed",
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share it via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store_path: PathBuf,
    import_command: Option<String>,
    readiness: RwLock<Readiness>,
    dataset: RwLock<Option<Arc<AirportDataset>>>,
}

impl AppState {
    /// Create state in the `Initializing` phase with no dataset published.
    pub fn new(store_path: impl Into<PathBuf>, import_command: Option<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store_path: store_path.into(),
                import_command,
                readiness: RwLock::new(Readiness::Initializing),
                dataset: RwLock::new(None),
            }),
        }
    }

    /// Path of the backing SQLite store, for health connectivity probes.
    pub fn store_path(&self) -> &Path {
        &self.inner.store_path
    }

    /// Configured external ingestion trigger command, if any.
    pub fn import_command(&self) -> Option<&str> {
        self.inner.import_command.as_deref()
    }

    /// Current readiness value.
    pub fn readiness(&self) -> Readiness {
        *self
            .inner
            .readiness
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Access the published dataset snapshot, failing closed.
    ///
    /// Returns the current readiness as the error until a snapshot has been
    /// published, so callers can shape a not-ready response instead of ever
    /// touching partially-initialized data.
    pub fn dataset(&self) -> Result<Arc<AirportDataset>, Readiness> {
        let readiness = self.readiness();
        if readiness != Readiness::Ready {
            return Err(readiness);
        }
        self.inner
            .dataset
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Readiness::Initializing)
    }

    /// Number of airports in the published snapshot, zero before `Ready`.
    pub fn airports_count(&self) -> usize {
        self.inner
            .dataset
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|d| d.len())
            .unwrap_or(0)
    }

    /// Publish a fully-built snapshot and flip readiness to `Ready`.
    ///
    /// The dataset is stored before the flag flips so a reader that
    /// observes `Ready` always finds a snapshot.
    pub fn publish_dataset(&self, dataset: AirportDataset) {
        *self
            .inner
            .dataset
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(dataset));
        *self
            .inner
            .readiness
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Readiness::Ready;
    }

    /// Flip readiness to `Failed`. Only effective while `Initializing`;
    /// there is no transition out of `Ready`.
    pub fn mark_failed(&self) {
        let mut readiness = self
            .inner
            .readiness
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *readiness == Readiness::Initializing {
            *readiness = Readiness::Failed;
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store_path", &self.inner.store_path)
            .field("readiness", &self.readiness())
            .field("airports_count", &self.airports_count())
            .finish()
    }
}
