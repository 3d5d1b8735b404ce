#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_utils::{expense, income, ymd};
use rust_decimal_macros::dec;

fn config() -> RecurrenceConfig {
    RecurrenceConfig::default()
}

fn charges(merchant: &str, amount: Decimal, dates: &[&str]) -> Vec<TransactionRecord> {
    dates
        .iter()
        .map(|d| expense(d, amount, merchant, "Bills"))
        .collect()
}

// ── interval_stats ────────────────────────────────────────────

#[test]
fn test_interval_stats_even_gaps() {
    let dates = vec![ymd(2024, 1, 1), ymd(2024, 1, 15), ymd(2024, 1, 29)];
    let (mean, std) = interval_stats(&dates);
    assert_eq!(mean, 14.0);
    assert_eq!(std, 0.0);
}

#[test]
fn test_interval_stats_population_std() {
    // gaps 10 and 20: mean 15, population variance 25, std 5
    let dates = vec![ymd(2024, 1, 1), ymd(2024, 1, 11), ymd(2024, 1, 31)];
    let (mean, std) = interval_stats(&dates);
    assert_eq!(mean, 15.0);
    assert!((std - 5.0).abs() < 1e-9);
}

#[test]
fn test_interval_stats_single_date() {
    assert_eq!(interval_stats(&[ymd(2024, 1, 1)]), (0.0, 0.0));
    assert_eq!(interval_stats(&[]), (0.0, 0.0));
}

// ── classify ──────────────────────────────────────────────────

#[test]
fn test_classify_bands() {
    let c = config();
    assert_eq!(classify(30.0, 1.0, &c), Some(Frequency::Monthly));
    assert_eq!(classify(25.0, 0.0, &c), Some(Frequency::Monthly));
    assert_eq!(classify(35.0, 0.0, &c), Some(Frequency::Monthly));
    assert_eq!(classify(14.0, 0.0, &c), Some(Frequency::Biweekly));
    assert_eq!(classify(12.0, 0.0, &c), Some(Frequency::Biweekly));
    assert_eq!(classify(16.0, 0.0, &c), Some(Frequency::Biweekly));
    assert_eq!(classify(20.0, 0.0, &c), None);
    assert_eq!(classify(7.0, 0.0, &c), None);
    assert_eq!(classify(365.0, 0.0, &c), None);
}

#[test]
fn test_classify_std_deviation_is_strict() {
    let c = config();
    assert_eq!(classify(30.0, 4.99, &c), Some(Frequency::Monthly));
    assert_eq!(classify(30.0, 5.0, &c), None);
}

#[test]
fn test_classify_uses_config() {
    let c = RecurrenceConfig {
        max_std_deviation: 1.0,
        ..RecurrenceConfig::default()
    };
    assert_eq!(classify(30.0, 2.0, &c), None);
}

// ── detect_recurring ──────────────────────────────────────────

#[test]
fn test_netflix_monthly() {
    let records = charges("Netflix", dec!(15.00), &["2024-01-01", "2024-02-01", "2024-03-03"]);
    let found = detect_recurring(&records, &config());
    assert_eq!(found.len(), 1);
    let netflix = &found[0];
    assert_eq!(netflix.merchant, "Netflix");
    assert_eq!(netflix.frequency, Some(Frequency::Monthly));
    assert_eq!(netflix.average_amount, dec!(15.00));
    // 2024 is a leap year: Jan 1 → Feb 1 is 31 days, Feb 1 → Mar 3 is 31 days
    assert_eq!(netflix.mean_interval, 31.0);
    assert!(netflix.std_deviation < 5.0);
    assert_eq!(netflix.dates.len(), 3);
}

#[test]
fn test_biweekly_paycheck_style_expense() {
    let records = charges(
        "Daycare",
        dec!(400),
        &["2024-01-05", "2024-01-19", "2024-02-02", "2024-02-16"],
    );
    let found = detect_recurring(&records, &config());
    assert_eq!(found[0].frequency, Some(Frequency::Biweekly));
}

#[test]
fn test_irregular_merchant_dropped() {
    let records = charges(
        "Hardware Store",
        dec!(30),
        &["2024-01-01", "2024-01-03", "2024-02-20", "2024-03-01"],
    );
    assert!(detect_recurring(&records, &config()).is_empty());
    // Still reported as a candidate with its statistics
    let all = candidates(&records, &config());
    assert_eq!(all.len(), 1);
    assert!(!all[0].is_recurring());
}

#[test]
fn test_single_charge_is_not_a_candidate() {
    let records = charges("Gym", dec!(50), &["2024-01-01"]);
    assert!(candidates(&records, &config()).is_empty());
}

#[test]
fn test_income_ignored() {
    let records = vec![
        income("2024-01-01", dec!(2000), "Employer"),
        income("2024-02-01", dec!(2000), "Employer"),
        income("2024-03-01", dec!(2000), "Employer"),
    ];
    assert!(detect_recurring(&records, &config()).is_empty());
}

#[test]
fn test_unsorted_input_dates() {
    let records = charges("Spotify", dec!(9.99), &["2024-03-01", "2024-01-01", "2024-02-01"]);
    let found = detect_recurring(&records, &config());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].dates[0], ymd(2024, 1, 1));
    assert_eq!(found[0].dates[2], ymd(2024, 3, 1));
}

#[test]
fn test_average_amount_varies() {
    let mut records = charges("Power Co", dec!(80), &["2024-01-10"]);
    records.extend(charges("Power Co", dec!(100), &["2024-02-10"]));
    records.extend(charges("Power Co", dec!(120), &["2024-03-11"]));
    let found = detect_recurring(&records, &config());
    assert_eq!(found[0].average_amount, dec!(100));
}

#[test]
fn test_exact_description_match_only() {
    let mut records = charges("NETFLIX.COM", dec!(15), &["2024-01-01"]);
    records.extend(charges("Netflix", dec!(15), &["2024-02-01"]));
    assert!(candidates(&records, &config()).is_empty());
}

#[test]
fn test_top_five_by_average_amount() {
    let dates = ["2024-01-01", "2024-02-01", "2024-03-01"];
    let mut records = Vec::new();
    for (i, name) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
        records.extend(charges(name, Decimal::from(10 * (i + 1)), &dates));
    }
    let found = detect_recurring(&records, &config());
    let names: Vec<&str> = found.iter().map(|c| c.merchant.as_str()).collect();
    assert_eq!(names, vec!["G", "F", "E", "D", "C"]);
}

#[test]
fn test_detection_is_idempotent() {
    let mut records = charges("Netflix", dec!(15), &["2024-01-01", "2024-02-01", "2024-03-03"]);
    records.extend(charges("Gym", dec!(40), &["2024-01-03", "2024-02-02", "2024-03-04"]));
    let first = detect_recurring(&records, &config());
    let second = detect_recurring(&records, &config());
    assert_eq!(first, second);
    assert_eq!(first[0].merchant, "Gym");
}
