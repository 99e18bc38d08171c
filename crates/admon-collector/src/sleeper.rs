//! Sleep abstraction for the collection loop.
//!
//! The loop never calls `tokio::time::sleep` directly, so tests can drive
//! many cycles without waiting out the poll interval.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use admon_core::BoxFuture;

pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Returns immediately and counts how often it was asked to sleep.
#[derive(Debug, Default)]
pub struct InstantSleeper {
    sleeps: AtomicUsize,
}

impl InstantSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::Relaxed)
    }
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) -> BoxFuture<'_, ()> {
        self.sleeps.fetch_add(1, Ordering::Relaxed);
        Box::pin(std::future::ready(()))
    }
}
