//! admon-store: read-only access to the admon recording database.
//!
//! The admon daemon records one row per server per sampling interval into
//! per-category SQLite tables. This crate only ever asks one question of
//! that database: "what is the newest row for this server?"
//!
//! # Architecture
//!
//! ```text
//! SnapshotSource (trait)
//!   ├── SqliteSnapshotStore  ← read-only connection per fetch, spawn_blocking
//!   └── MemorySnapshotSource ← in-memory records (tests, dry runs)
//! ```
//!
//! Table and column names live in [`tables`]; the store never creates or
//! migrates schema.

pub mod error;
pub mod memory;
pub mod source;
pub mod store;
pub mod tables;

pub use error::{StoreError, StoreResult};
pub use memory::MemorySnapshotSource;
pub use source::SnapshotSource;
pub use store::{SqliteSnapshotStore, MAX_BUSY_TIMEOUT};
