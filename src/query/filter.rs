use serde::Deserialize;

use crate::models::Transaction;

/// Conjunctive row predicate deserialized from a transaction query string.
///
/// Omitted parameters impose no constraint, and blank string parameters
/// (`?category=`) count as omitted. Date bounds compare lexically against the
/// row's rendered date, which is sound because both sides are fixed-width
/// `YYYY-MM-DD` text. Amount bounds are inclusive, so `min_amount=0` does
/// constrain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub currencies: Vec<String>,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let date = transaction.date.to_string();

        if let Some(start) = supplied(&self.start_date) {
            if date.as_str() < start {
                return false;
            }
        }

        if let Some(end) = supplied(&self.end_date) {
            if date.as_str() > end {
                return false;
            }
        }

        if let Some(category) = supplied(&self.category) {
            if transaction.category != category {
                return false;
            }
        }

        if let Some(source) = supplied(&self.source) {
            if transaction.source != source {
                return false;
            }
        }

        if let Some(min) = self.min_amount {
            if transaction.amount < min {
                return false;
            }
        }

        if let Some(max) = self.max_amount {
            if transaction.amount > max {
                return false;
            }
        }

        if !self.currencies.is_empty() && !self.currencies.contains(&transaction.currency) {
            return false;
        }

        true
    }

    /// Keeps the rows satisfying every supplied predicate, in their original
    /// order.
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions
            .into_iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }
}

/// The filter set the summary endpoint accepts: the transaction filters minus
/// the amount bounds. Unknown parameters, amount bounds included, are ignored
/// during deserialization rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub currencies: Vec<String>,
}

impl From<SummaryFilter> for TransactionFilter {
    fn from(filter: SummaryFilter) -> Self {
        Self {
            start_date: filter.start_date,
            end_date: filter.end_date,
            category: filter.category,
            source: filter.source,
            min_amount: None,
            max_amount: None,
            currencies: filter.currencies,
        }
    }
}

fn supplied(parameter: &Option<String>) -> Option<&str> {
    parameter.as_deref().filter(|value| !value.is_empty())
}
