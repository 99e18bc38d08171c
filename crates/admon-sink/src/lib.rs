//! admon-sink: forwarding aggregate documents to the metrics sink.
//!
//! The sink is an Elasticsearch-compatible HTTP index API. Each aggregate
//! document is indexed into `{namespace}-{category}` with a single
//! `POST /{collection}/_doc`.
//!
//! # Architecture
//!
//! ```text
//! SinkClient (trait)
//!   ├── HttpSink   ← hyper HTTP/1, one connection per submission
//!   └── MemorySink ← records accepted documents, can be told to reject
//!
//! probe() ← one-shot `GET /` connectivity check used at startup
//! ```
//!
//! There is no retry here: a failed submission is reported once and the
//! collection loop decides what it means.

pub mod client;
pub mod error;
pub mod http_sink;
pub mod memory;
pub mod probe;

pub use client::{collection_name, SinkClient};
pub use error::{SinkError, SinkResult};
pub use http_sink::HttpSink;
pub use memory::MemorySink;
pub use probe::probe;
