//! admon-core: shared model for the admon relay.
//!
//! Holds the snapshot types read from the admon recording database, the
//! aggregate document shape forwarded to the metrics sink, and the
//! `admon-relay.toml` configuration parser.

pub mod config;
pub mod types;

pub use config::{ConfigError, RelayConfig};
pub use types::*;
