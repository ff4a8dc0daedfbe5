use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single validated row from a dataset file.
///
/// Field order is the wire order: serialized rows carry their keys in the
/// order declared here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Twelve-character alphanumeric identifier. Uniqueness is not enforced.
    pub id: String,
    /// Booking date, fixed-width ISO `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Free-form text describing the transaction.
    pub description: String,
    /// Free-form category label.
    pub category: String,
    /// Originating account or system.
    pub source: String,
    /// Signed amount in minor currency units; positive is an inflow.
    pub amount: i64,
    /// Three-character currency code.
    pub currency: String,
}
