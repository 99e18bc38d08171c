//! In-memory sink that records what it accepts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use admon_core::BoxFuture;

use crate::client::SinkClient;
use crate::error::{SinkError, SinkResult};

#[derive(Default)]
pub struct MemorySink {
    accepted: Mutex<Vec<(String, serde_json::Value)>>,
    attempts: AtomicUsize,
    reject: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent submission with HTTP 503.
    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::Relaxed);
    }

    /// Documents accepted so far, as `(collection, document)` pairs.
    pub fn accepted(&self) -> Vec<(String, serde_json::Value)> {
        self.accepted
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// Total submissions, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    fn accept(&self, collection: &str, document: &serde_json::Value) -> SinkResult<()> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.reject.load(Ordering::Relaxed) {
            return Err(SinkError::Rejected {
                target: format!("/{collection}/_doc"),
                status: 503,
                body: "sink rejecting".to_string(),
            });
        }
        if let Ok(mut docs) = self.accepted.lock() {
            docs.push((collection.to_string(), document.clone()));
        }
        Ok(())
    }
}

impl SinkClient for MemorySink {
    fn submit<'a>(
        &'a self,
        collection: &'a str,
        document: &'a serde_json::Value,
    ) -> BoxFuture<'a, SinkResult<()>> {
        Box::pin(async move { self.accept(collection, document) })
    }
}
