use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CategoryKey;

/// Amount as delivered by the statement parser: a JSON number or a string
/// such as `"-1,234.56"` or `"$(12.00)"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One loosely-typed statement line. Every field is optional so a bad row
/// fails normalization on its own instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
}

impl RawTransaction {
    pub fn new(
        date: &str,
        amount: impl Into<RawAmount>,
        description: &str,
        category: Option<&str>,
        account: &str,
    ) -> Self {
        Self {
            date: Some(date.to_string()),
            amount: Some(amount.into()),
            description: Some(description.to_string()),
            category: category.map(str::to_string),
            account: Some(account.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: CategoryKey,
    pub account: String,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
