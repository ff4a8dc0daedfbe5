use serde::{Deserialize, Serialize};

/// Aggregate of every filtered row sharing one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySummary {
    /// The grouping key.
    pub currency: String,
    /// Sum of all positive amounts in the group.
    pub total_in: i64,
    /// Absolute sum of all negative amounts in the group.
    pub total_out: i64,
    /// `total_in - total_out`.
    pub balance: i64,
}

impl CurrencySummary {
    /// Combined inflow and outflow volume, saturating at the `i64` ceiling;
    /// summaries are ordered by this, largest first.
    pub fn activity(&self) -> i64 {
        self.total_in.saturating_add(self.total_out)
    }
}
