mod summary;
mod transaction;

use serde::{Deserialize, Serialize};

pub use summary::CurrencySummary;
pub use transaction::Transaction;

/// Name and row count of one dataset file, recomputed on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub transactions_count: usize,
}
