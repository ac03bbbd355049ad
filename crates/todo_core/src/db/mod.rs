//! Local task store: SQLite file, schema and the errors opening it reports.
//!
//! # Responsibility
//! - Open the task store and bring its schema up to date.
//! - Report why a store could not be used (`StoreError`).
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A connection is handed out only after every migration has applied.
//! - A store written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type StoreResult<T> = Result<T, StoreError>;

/// Why the local task store is unusable.
#[derive(Debug)]
pub enum StoreError {
    /// The store file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// A statement against an open store failed.
    Sqlite(rusqlite::Error),
    /// The store carries tasks in a layout this build does not know.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open task store `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "task store query failed: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "task store schema v{found} was written by a newer build (this build supports v{supported})"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
