//! SqliteSnapshotStore: read-only view of the admon recording database.
//!
//! The database is owned by the admon daemon; this store opens it with
//! `SQLITE_OPEN_READ_ONLY` and never writes. SQLite calls are blocking, so
//! every fetch runs on the tokio blocking pool.

use std::path::{Path, PathBuf};
use std::time::Duration;

use admon_core::{
    BoxFuture, Category, MetaSnapshot, ServerId, SnapshotRecord, StorageSnapshot,
};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::source::SnapshotSource;
use crate::tables::table_for;

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Longest busy timeout SQLite accepts (`i32::MAX` milliseconds).
pub const MAX_BUSY_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

/// Read-only snapshot store backed by SQLite.
///
/// Every query opens its own read-only connection, so a fetch that is still
/// waiting on the admon daemon's lock never holds up the others.
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteSnapshotStore {
    /// Open an existing admon database read-only.
    ///
    /// `busy_timeout` bounds how long a query waits on the admon daemon's
    /// write lock and is capped at [`MAX_BUSY_TIMEOUT`].
    pub fn open(path: &Path, busy_timeout: Duration) -> StoreResult<Self> {
        let store = Self {
            path: path.to_path_buf(),
            busy_timeout: busy_timeout.min(MAX_BUSY_TIMEOUT),
        };
        store.connect()?;
        debug!(?path, busy_timeout = ?store.busy_timeout, "snapshot store opened");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    fn connect(&self) -> StoreResult<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(map_err!(Unavailable))?;
        Ok(conn)
    }

    /// Check that every category table is present.
    pub fn verify(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        for category in Category::ALL {
            let table = table_for(category);
            let found: Option<String> = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table.name],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_err!(Unavailable))?;
            if found.is_none() {
                return Err(StoreError::Unavailable(format!(
                    "{}: missing table '{}'",
                    self.path.display(),
                    table.name
                )));
            }
        }
        debug!(path = ?self.path, "snapshot store schema verified");
        Ok(())
    }

    /// Blocking fetch of the newest row for `server`.
    pub fn latest_blocking(
        &self,
        category: Category,
        server: &ServerId,
    ) -> StoreResult<SnapshotRecord> {
        let table = table_for(category);
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&table.latest_row_query())
            .map_err(map_err!(Unavailable))?;

        let row = stmt
            .query_row([server.as_str()], |row| read_record(category, row))
            .optional()
            .map_err(|e| classify(e, category, server))?;

        match row {
            Some(record) => {
                debug!(%category, %server, table = table.name, "snapshot fetched");
                Ok(record)
            }
            None => Err(StoreError::NotFound {
                category,
                server: server.clone(),
            }),
        }
    }
}

impl SnapshotSource for SqliteSnapshotStore {
    fn fetch_latest<'a>(
        &'a self,
        category: Category,
        server: &'a ServerId,
    ) -> BoxFuture<'a, StoreResult<SnapshotRecord>> {
        let store = self.clone();
        let server = server.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || store.latest_blocking(category, &server))
                .await
                .map_err(|e| StoreError::Unavailable(format!("fetch task failed: {e}")))?
        })
    }
}

fn read_record(category: Category, row: &Row<'_>) -> rusqlite::Result<SnapshotRecord> {
    Ok(match category {
        Category::Meta => SnapshotRecord::Meta(MetaSnapshot {
            work_requests: row.get(0)?,
            queued_requests: row.get(1)?,
        }),
        Category::Storage => SnapshotRecord::Storage(StorageSnapshot {
            disk_read: row.get(0)?,
            disk_write: row.get(1)?,
            disk_read_per_sec: row.get(2)?,
            disk_write_per_sec: row.get(3)?,
            disk_space_total: row.get(4)?,
            disk_space_free: row.get(5)?,
        }),
    })
}

/// Column type mismatches are bad rows; everything else means the store
/// itself could not answer.
fn classify(e: rusqlite::Error, category: Category, server: &ServerId) -> StoreError {
    match e {
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::IntegralValueOutOfRange(..) => {
            StoreError::Decode {
                category,
                server: server.clone(),
                reason: e.to_string(),
            }
        }
        other => StoreError::Unavailable(other.to_string()),
    }
}
