use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Per-category spending limits, keyed by category name.
///
/// Limits are never negative. A zero limit is kept but treated as "no budget
/// set" by the recommender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Budget {
    limits: BTreeMap<String, Decimal>,
}

impl Budget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(category, limit)` pairs. Fails on the first negative limit.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut budget = Self::new();
        for (category, limit) in pairs {
            budget.set(category, limit)?;
        }
        Ok(budget)
    }

    pub fn set(&mut self, category: impl Into<String>, limit: Decimal) -> Result<()> {
        let category = category.into();
        if limit < Decimal::ZERO {
            return Err(Error::InvalidBudget {
                category,
                amount: limit,
            });
        }
        self.limits.insert(category, limit);
        Ok(())
    }

    pub fn remove(&mut self, category: &str) -> Option<Decimal> {
        self.limits.remove(category)
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.limits.get(category).copied()
    }

    /// The limit for `category` if one is set and greater than zero.
    pub fn active_limit(&self, category: &str) -> Option<Decimal> {
        self.get(category).filter(|l| *l > Decimal::ZERO)
    }

    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn total(&self) -> Decimal {
        self.limits
            .values()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}
