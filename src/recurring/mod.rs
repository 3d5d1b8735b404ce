//! Recurring charge detection.
//!
//! A merchant is recurring when the gaps between its charges are both tight
//! (low standard deviation) and sized like a billing cycle. Merchants are
//! matched on the exact description text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::RecurrenceConfig;
use crate::models::TransactionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Biweekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Biweekly => "Biweekly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurrenceCandidate {
    pub merchant: String,
    /// Ascending
    pub dates: Vec<NaiveDate>,
    /// Mean gap between consecutive charges, in days
    pub mean_interval: f64,
    /// Population standard deviation of the gaps, in days
    pub std_deviation: f64,
    pub average_amount: Decimal,
    pub frequency: Option<Frequency>,
}

impl RecurrenceCandidate {
    pub fn is_recurring(&self) -> bool {
        self.frequency.is_some()
    }
}

/// Interval statistics for every merchant with at least two expense charges,
/// classified or not, ordered by merchant.
pub fn candidates(
    records: &[TransactionRecord],
    config: &RecurrenceConfig,
) -> Vec<RecurrenceCandidate> {
    let mut by_merchant: BTreeMap<&str, Vec<(NaiveDate, Decimal)>> = BTreeMap::new();
    for txn in records.iter().filter(|t| t.is_expense()) {
        by_merchant
            .entry(txn.description.as_str())
            .or_default()
            .push((txn.date, txn.abs_amount()));
    }

    by_merchant
        .into_iter()
        .filter(|(_, charges)| charges.len() >= 2)
        .map(|(merchant, charges)| {
            let mut dates: Vec<NaiveDate> = charges.iter().map(|(d, _)| *d).collect();
            dates.sort();
            let (mean_interval, std_deviation) = interval_stats(&dates);

            let total: Decimal = charges.iter().map(|(_, a)| *a).sum();
            let average_amount = total / Decimal::from(charges.len());

            RecurrenceCandidate {
                merchant: merchant.to_string(),
                dates,
                mean_interval,
                std_deviation,
                average_amount,
                frequency: classify(mean_interval, std_deviation, config),
            }
        })
        .collect()
}

/// Recurring merchants only, highest average charge first, capped at
/// `config.top_n`.
pub fn detect_recurring(
    records: &[TransactionRecord],
    config: &RecurrenceConfig,
) -> Vec<RecurrenceCandidate> {
    let mut recurring: Vec<RecurrenceCandidate> = candidates(records, config)
        .into_iter()
        .filter(RecurrenceCandidate::is_recurring)
        .collect();
    recurring.sort_by(|a, b| {
        b.average_amount
            .cmp(&a.average_amount)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    recurring.truncate(config.top_n);

    debug!(recurring = recurring.len(), "detected recurring merchants");
    recurring
}

/// Mean and population standard deviation of the day gaps between sorted
/// dates. Fewer than two dates has no gaps and yields `(0.0, 0.0)`.
pub fn interval_stats(sorted_dates: &[NaiveDate]) -> (f64, f64) {
    let gaps: Vec<f64> = sorted_dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();
    if gaps.is_empty() {
        return (0.0, 0.0);
    }
    let n = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / n;
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

pub fn classify(
    mean_interval: f64,
    std_deviation: f64,
    config: &RecurrenceConfig,
) -> Option<Frequency> {
    if std_deviation >= config.max_std_deviation {
        return None;
    }
    let monthly = config.monthly_min_interval..=config.monthly_max_interval;
    let biweekly = config.biweekly_min_interval..=config.biweekly_max_interval;
    if monthly.contains(&mean_interval) {
        Some(Frequency::Monthly)
    } else if biweekly.contains(&mean_interval) {
        Some(Frequency::Biweekly)
    } else {
        None
    }
}

#[cfg(test)]
mod tests;
