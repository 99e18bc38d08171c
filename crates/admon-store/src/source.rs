//! The snapshot source contract consumed by the collection loop.

use admon_core::{BoxFuture, Category, ServerId, SnapshotRecord};

use crate::error::StoreResult;

/// Read-only accessor for the newest recorded observation of a server.
///
/// Implementations must not mutate the store. A missing row is
/// [`StoreError::NotFound`](crate::StoreError::NotFound); an unreachable or
/// failing store is [`StoreError::Unavailable`](crate::StoreError::Unavailable).
pub trait SnapshotSource: Send + Sync {
    /// Fetch the most recently timestamped record for `server` in `category`.
    fn fetch_latest<'a>(
        &'a self,
        category: Category,
        server: &'a ServerId,
    ) -> BoxFuture<'a, StoreResult<SnapshotRecord>>;
}
