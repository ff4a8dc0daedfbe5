use std::collections::BTreeMap;

use crate::models::{CurrencySummary, Transaction};

/// Groups transactions by currency and totals inflows and outflows per group.
///
/// Positive amounts accumulate into `total_in` and negative ones into
/// `total_out` as a magnitude; both totals saturate at the `i64` ceiling. A
/// zero amount contributes to neither but still materializes its currency's
/// group. The result is sorted by descending combined activity; grouping is
/// alphabetical and the sort stable, so equal-activity currencies come out
/// in alphabetical order.
pub fn summarize(transactions: &[Transaction]) -> Vec<CurrencySummary> {
    let mut groups: BTreeMap<&str, (i64, i64)> = BTreeMap::new();

    for transaction in transactions {
        let (total_in, total_out) = groups.entry(transaction.currency.as_str()).or_default();
        if transaction.amount > 0 {
            *total_in = total_in.saturating_add(transaction.amount);
        } else {
            *total_out = total_out.saturating_sub(transaction.amount);
        }
    }

    let mut summaries: Vec<CurrencySummary> = groups
        .into_iter()
        .map(|(currency, (total_in, total_out))| CurrencySummary {
            currency: currency.to_string(),
            total_in,
            total_out,
            balance: total_in - total_out,
        })
        .collect();

    summaries.sort_by(|a, b| b.activity().cmp(&a.activity()));

    summaries
}
