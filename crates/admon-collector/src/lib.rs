//! admon-collector: the relay's collection loop.
//!
//! Each cycle fans out one fetch per configured server, folds the
//! per-category snapshots into a single aggregate document, submits it to
//! the sink, and feeds the cycle's verdict into a failure budget that
//! decides whether the agent keeps going.
//!
//! # Architecture
//!
//! ```text
//! CollectionLoop
//!   ├── run_cycle()
//!   │   ├── SnapshotSource::fetch_latest() × servers  (JoinSet, per-call timeout)
//!   │   ├── aggregate() → AggregateDocument            (pure fold)
//!   │   └── SinkClient::submit()                       (per-call timeout)
//!   ├── FailureBudget::record()  → Running | Terminated
//!   └── run() → cycle, Sleeper::sleep() / shutdown, repeat
//! ```
//!
//! # Failure budget
//!
//! A failed cycle bumps the consecutive-failure counter. Every
//! `reset_window_cycles` cycles the counter is cleared regardless of
//! outcome. Reaching `failure_budget` terminates the loop for good.

pub mod aggregator;
pub mod budget;
pub mod collector;
pub mod sleeper;

pub use aggregator::{aggregate, aggregate_at, AggregateError};
pub use budget::{CycleVerdict, FailureBudget, LoopState};
pub use collector::{CategoryOutcome, CollectionLoop, CycleReport, LoopExit, LoopSettings};
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper};
