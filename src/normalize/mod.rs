//! Raw statement rows → typed [`TransactionRecord`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CategoryKey, RawAmount, RawTransaction, TransactionRecord};

/// Outcome of normalizing a batch. Rejections never stop the batch; the
/// caller decides whether any of them is fatal.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<TransactionRecord>,
    pub rejected: Vec<Error>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Largest accepted magnitude. Sums over any batch that fits in memory stay
/// far below `Decimal::MAX`.
pub const MAX_ABS_AMOUNT: i64 = 1_000_000_000_000_000;

/// Normalize every row, keeping input order for the accepted ones.
pub fn normalize_rows(rows: &[RawTransaction]) -> Normalized {
    let mut out = Normalized::default();
    for (i, row) in rows.iter().enumerate() {
        match normalize_row(i, row) {
            Ok(record) => out.records.push(record),
            Err(e) => out.rejected.push(e),
        }
    }
    debug!(
        accepted = out.records.len(),
        rejected = out.rejected.len(),
        "normalized statement rows"
    );
    out
}

/// Normalize one row. `row` is its position in the batch, used in errors.
pub fn normalize_row(row: usize, raw: &RawTransaction) -> Result<TransactionRecord> {
    let malformed = |reason: String| Error::MalformedRecord { row, reason };

    let date_str = raw
        .date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed("missing date".into()))?;
    let date = parse_date(date_str)
        .ok_or_else(|| malformed(format!("could not parse date '{date_str}'")))?;

    let amount = match &raw.amount {
        None => return Err(malformed("missing amount".into())),
        Some(a) => parse_amount(a).map_err(malformed)?,
    };
    if amount.abs() > Decimal::from(MAX_ABS_AMOUNT) {
        return Err(malformed(format!("amount {amount} is out of range")));
    }

    let description = required_text(raw.description.as_deref())
        .ok_or_else(|| malformed("missing description".into()))?;
    let account = required_text(raw.account.as_deref())
        .ok_or_else(|| malformed("missing account".into()))?;

    Ok(TransactionRecord {
        date,
        amount,
        description,
        category: CategoryKey::from_label(raw.category.as_deref()),
        account,
    })
}

fn required_text(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Two-digit years go before four-digit ones: `%Y` would happily read "24" as year 24.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Date-times: only the calendar date matters
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

pub(crate) fn parse_amount(raw: &RawAmount) -> std::result::Result<Decimal, String> {
    match raw {
        RawAmount::Number(n) => {
            if !n.is_finite() {
                return Err(format!("amount {n} is not finite"));
            }
            // Display of f64 is the shortest round-trip form, never exponent notation
            Decimal::from_str(&n.to_string())
                .map_err(|_| format!("amount {n} is out of range"))
        }
        RawAmount::Text(s) => parse_decimal(s),
    }
}

pub(crate) fn parse_decimal(s: &str) -> std::result::Result<Decimal, String> {
    let cleaned = s
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Err("missing amount".into());
    }
    // "-(12.00)" and "$(12.00)" both end up with a single leading minus
    let cleaned = cleaned.replace("--", "-");
    Decimal::from_str(&cleaned).map_err(|_| format!("could not parse amount '{s}'"))
}
