//! Task store connection bootstrap.
//!
//! # Invariants
//! - Returned connections wait up to `BUSY_TIMEOUT` on a locked store.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY_PATH: &str = ":memory:";

/// Opens (or creates) the task store at `path` and migrates it.
///
/// Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let path = path.as_ref();
    open_store(path.to_path_buf(), || Connection::open(path))
}

/// Opens a throwaway in-memory task store, migrated like a file store.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    open_store(PathBuf::from(IN_MEMORY_PATH), Connection::open_in_memory)
}

fn open_store(
    path: PathBuf,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let result = open()
        .map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        });

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok path={} duration_ms={duration_ms}",
            path.display()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error path={} duration_ms={duration_ms} error={err}",
            path.display()
        ),
    }
    result
}
