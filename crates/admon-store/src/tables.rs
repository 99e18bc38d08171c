//! admon table definitions.
//!
//! Every category table carries a `nodeID` column naming the server and a
//! monotonic `time` column; the remaining columns are read positionally in
//! the order listed here.

use admon_core::Category;

/// Column holding the server identifier.
pub const NODE_COLUMN: &str = "nodeID";

/// Monotonic sample time column used for "newest row" ordering.
pub const TIME_COLUMN: &str = "time";

/// One per-category table of the admon database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Metadata-server samples.
pub const META_NORMAL: CategoryTable = CategoryTable {
    name: "metaNormal",
    columns: &["workRequests", "queuedRequests"],
};

/// Storage-server samples.
pub const STORAGE_NORMAL: CategoryTable = CategoryTable {
    name: "storageNormal",
    columns: &[
        "diskRead",
        "diskWrite",
        "diskReadPerSec",
        "diskWritePerSec",
        "diskSpaceTotal",
        "diskSpaceFree",
    ],
};

pub fn table_for(category: Category) -> &'static CategoryTable {
    match category {
        Category::Meta => &META_NORMAL,
        Category::Storage => &STORAGE_NORMAL,
    }
}

impl CategoryTable {
    /// Query returning the newest row for the server bound to `?1`.
    pub fn latest_row_query(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {NODE_COLUMN} = ?1 ORDER BY {TIME_COLUMN} DESC LIMIT 1",
            self.columns.join(", "),
            self.name,
        )
    }
}
