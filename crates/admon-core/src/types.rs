//! Shared types used across admon-relay crates.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed future alias used by the injected collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ── Servers ────────────────────────────────────────────────────────

/// Name of one metadata or storage node as recorded by admon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("server identifier must not be empty")]
pub struct EmptyServerId;

impl ServerId {
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyServerId> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EmptyServerId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServerId {
    type Error = EmptyServerId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServerId> for String {
    fn from(id: ServerId) -> Self {
        id.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Categories ─────────────────────────────────────────────────────

/// Metric domain a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Metadata-server request load.
    Meta,
    /// Storage-server I/O and capacity.
    Storage,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Meta, Category::Storage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Meta => "meta",
            Category::Storage => "storage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Snapshots ──────────────────────────────────────────────────────

/// A per-server observation that can be summed with others of its kind.
///
/// `combine` must be associative and commutative so that aggregation is
/// independent of the order servers were fetched in.
pub trait Snapshot:
    Copy
    + Default
    + fmt::Debug
    + PartialEq
    + Serialize
    + TryFrom<SnapshotRecord, Error = SnapshotRecord>
    + Send
    + 'static
{
    /// Category this snapshot type is recorded under.
    const CATEGORY: Category;

    /// Field-wise sum of two snapshots.
    fn combine(self, other: Self) -> Self;
}

/// Latest metadata-service load for one server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaSnapshot {
    pub work_requests: i64,
    pub queued_requests: i64,
}

impl Snapshot for MetaSnapshot {
    const CATEGORY: Category = Category::Meta;

    fn combine(self, other: Self) -> Self {
        Self {
            work_requests: self.work_requests.wrapping_add(other.work_requests),
            queued_requests: self.queued_requests.wrapping_add(other.queued_requests),
        }
    }
}

/// Latest disk I/O and capacity figures for one storage server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSnapshot {
    pub disk_read: i64,
    pub disk_write: i64,
    pub disk_read_per_sec: i64,
    pub disk_write_per_sec: i64,
    pub disk_space_total: i64,
    pub disk_space_free: i64,
}

impl Snapshot for StorageSnapshot {
    const CATEGORY: Category = Category::Storage;

    fn combine(self, other: Self) -> Self {
        Self {
            disk_read: self.disk_read.wrapping_add(other.disk_read),
            disk_write: self.disk_write.wrapping_add(other.disk_write),
            disk_read_per_sec: self.disk_read_per_sec.wrapping_add(other.disk_read_per_sec),
            disk_write_per_sec: self.disk_write_per_sec.wrapping_add(other.disk_write_per_sec),
            disk_space_total: self.disk_space_total.wrapping_add(other.disk_space_total),
            disk_space_free: self.disk_space_free.wrapping_add(other.disk_space_free),
        }
    }
}

/// A snapshot as returned by a store, tagged with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotRecord {
    Meta(MetaSnapshot),
    Storage(StorageSnapshot),
}

impl SnapshotRecord {
    pub fn category(&self) -> Category {
        match self {
            SnapshotRecord::Meta(_) => Category::Meta,
            SnapshotRecord::Storage(_) => Category::Storage,
        }
    }
}

impl From<MetaSnapshot> for SnapshotRecord {
    fn from(s: MetaSnapshot) -> Self {
        SnapshotRecord::Meta(s)
    }
}

impl From<StorageSnapshot> for SnapshotRecord {
    fn from(s: StorageSnapshot) -> Self {
        SnapshotRecord::Storage(s)
    }
}

impl TryFrom<SnapshotRecord> for MetaSnapshot {
    type Error = SnapshotRecord;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        match record {
            SnapshotRecord::Meta(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl TryFrom<SnapshotRecord> for StorageSnapshot {
    type Error = SnapshotRecord;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        match record {
            SnapshotRecord::Storage(s) => Ok(s),
            other => Err(other),
        }
    }
}

// ── Aggregate documents ────────────────────────────────────────────

/// Per-category totals for one cycle, as submitted to the sink.
///
/// Serializes flat: `{"timestamp": "...", "workRequests": 8, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDocument<S> {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub totals: S,
}

impl<S: Snapshot> AggregateDocument<S> {
    pub fn category(&self) -> Category {
        S::CATEGORY
    }
}
