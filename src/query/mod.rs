//! Filter predicates and aggregation applied to validated datasets.

mod aggregate;
mod filter;

pub use aggregate::summarize;
pub use filter::{SummaryFilter, TransactionFilter};
