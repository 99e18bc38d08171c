//! In-memory snapshot source.
//!
//! Holds one record per (category, server) and can be flipped into an
//! "unavailable" state to simulate a store outage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use admon_core::{BoxFuture, Category, ServerId, SnapshotRecord};

use crate::error::{StoreError, StoreResult};
use crate::source::SnapshotSource;

#[derive(Default)]
pub struct MemorySnapshotSource {
    records: RwLock<HashMap<(Category, ServerId), SnapshotRecord>>,
    unavailable: AtomicBool,
}

impl MemorySnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `snapshot` as the newest observation for `server`.
    pub fn insert(&self, server: &ServerId, snapshot: impl Into<SnapshotRecord>) {
        let record = snapshot.into();
        if let Ok(mut records) = self.records.write() {
            records.insert((record.category(), server.clone()), record);
        }
    }

    pub fn remove(&self, category: Category, server: &ServerId) {
        if let Ok(mut records) = self.records.write() {
            records.remove(&(category, server.clone()));
        }
    }

    /// Make every subsequent fetch fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn lookup(&self, category: Category, server: &ServerId) -> StoreResult<SnapshotRecord> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))?;
        records
            .get(&(category, server.clone()))
            .copied()
            .ok_or_else(|| StoreError::NotFound {
                category,
                server: server.clone(),
            })
    }
}

impl SnapshotSource for MemorySnapshotSource {
    fn fetch_latest<'a>(
        &'a self,
        category: Category,
        server: &'a ServerId,
    ) -> BoxFuture<'a, StoreResult<SnapshotRecord>> {
        Box::pin(async move { self.lookup(category, server) })
    }
}
