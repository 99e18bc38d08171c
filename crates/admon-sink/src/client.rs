//! The sink contract consumed by the collection loop.

use admon_core::{BoxFuture, Category};

use crate::error::SinkResult;

/// Submits one JSON document into a named collection.
///
/// Implementations perform exactly one attempt per call and bound it with
/// their own timeout; the collection loop adds none.
pub trait SinkClient: Send + Sync {
    fn submit<'a>(
        &'a self,
        collection: &'a str,
        document: &'a serde_json::Value,
    ) -> BoxFuture<'a, SinkResult<()>>;
}

/// Target collection for a category's documents.
pub fn collection_name(namespace: &str, category: Category) -> String {
    format!("{namespace}-{category}")
}
