//! Fixtures shared by the unit tests.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{CategoryKey, TransactionRecord};

pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Build a record from an ISO date string.
pub(crate) fn txn(
    date: &str,
    amount: Decimal,
    description: &str,
    category: Option<&str>,
    account: &str,
) -> TransactionRecord {
    TransactionRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        description: description.into(),
        category: CategoryKey::from_label(category),
        account: account.into(),
    }
}

/// Expense shorthand: `amount` is the positive magnitude.
pub(crate) fn expense(
    date: &str,
    amount: Decimal,
    description: &str,
    category: &str,
) -> TransactionRecord {
    txn(date, -amount, description, Some(category), "Checking")
}

pub(crate) fn income(date: &str, amount: Decimal, description: &str) -> TransactionRecord {
    txn(date, amount, description, Some("Income"), "Checking")
}
