use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the airport atlas library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the backing store is reachable but yields no usable data.
    #[error("airport data unavailable: {reason}")]
    DataUnavailable { reason: String },

    /// Raised when a resolver is asked to search a dataset with no records.
    #[error("airport dataset is empty")]
    EmptyDataset,

    /// Raised when the backing store cannot be opened or pinged.
    #[error("failed to connect to airport store at {path}")]
    StoreConnection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Raised when the initialization supervisor exhausts its retry budget.
    #[error("initialization gave up while {phase} after {attempts} attempts")]
    InitTimedOut { phase: &'static str, attempts: u32 },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
