//! Filtering and sorting for transaction listings.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::TransactionRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Description,
    Category,
    Account,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "description" => Ok(Self::Description),
            "category" => Ok(Self::Category),
            "account" => Ok(Self::Account),
            other => Err(Error::Config(format!(
                "unknown sort key '{other}' (expected date, amount, description, category or account)"
            ))),
        }
    }
}

/// Unset fields match everything. Defaults to newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Case-insensitive substring of description or category name
    pub search: Option<String>,
    pub account: Option<String>,
    pub category: Option<String>,
    /// Inclusive
    pub from: Option<NaiveDate>,
    /// Inclusive
    pub to: Option<NaiveDate>,
    pub sort: SortKey,
    pub descending: bool,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            search: None,
            account: None,
            category: None,
            from: None,
            to: None,
            sort: SortKey::Date,
            descending: true,
        }
    }
}

impl TransactionQuery {
    pub fn matches(&self, txn: &TransactionRecord) -> bool {
        if let Some(s) = &self.search {
            let needle = s.to_lowercase();
            let hit = txn.description.to_lowercase().contains(&needle)
                || txn.category.name().to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if self.account.as_deref().is_some_and(|a| a != txn.account) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|c| c != txn.category.name())
        {
            return false;
        }
        if self.from.is_some_and(|d| txn.date < d) {
            return false;
        }
        if self.to.is_some_and(|d| txn.date > d) {
            return false;
        }
        true
    }

    /// Matching records in the requested order. Equal keys keep input order.
    pub fn apply<'a>(&self, records: &'a [TransactionRecord]) -> Vec<&'a TransactionRecord> {
        let mut out: Vec<&TransactionRecord> = records.iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| {
            let ord = compare(self.sort, a, b);
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        out
    }
}

fn compare(key: SortKey, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Description => a.description.cmp(&b.description),
        SortKey::Category => a.category.name().cmp(b.category.name()),
        SortKey::Account => a.account.cmp(&b.account),
    }
}

/// The `n` most recent records, newest first.
pub fn recent(records: &[TransactionRecord], n: usize) -> Vec<TransactionRecord> {
    TransactionQuery::default()
        .apply(records)
        .into_iter()
        .take(n)
        .cloned()
        .collect()
}
