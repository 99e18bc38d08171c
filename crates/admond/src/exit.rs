//! Process exit codes.

use std::process::ExitCode;

use admon_core::ConfigError;
use admon_sink::SinkError;
use admon_store::StoreError;
use thiserror::Error;

pub mod codes {
    /// Clean shutdown, or a one-shot command that succeeded.
    pub const SUCCESS: u8 = 0;
    /// The configuration could not be loaded or is invalid.
    pub const CONFIG_INVALID: u8 = 1;
    /// The store or the sink was not usable at startup.
    pub const STARTUP: u8 = 2;
    /// The failure budget ran out, or a `--once` cycle failed.
    pub const COLLECTION: u8 = 3;
}

/// Everything that ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("store unavailable at startup: {0}")]
    Store(#[from] StoreError),

    #[error("sink unreachable at startup: {0}")]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Startup(#[from] anyhow::Error),

    #[error("failure budget exhausted after {cycles} cycles ({failed_cycles} failed)")]
    BudgetExhausted { cycles: u64, failed_cycles: u32 },

    #[error("collection cycle {cycle} failed")]
    CycleFailed { cycle: u64 },
}

impl Failure {
    pub fn code(&self) -> u8 {
        match self {
            Failure::Config(_) => codes::CONFIG_INVALID,
            Failure::Store(_) | Failure::Sink(_) | Failure::Startup(_) => codes::STARTUP,
            Failure::BudgetExhausted { .. } | Failure::CycleFailed { .. } => codes::COLLECTION,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
