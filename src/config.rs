//! Tunable thresholds for the analysis pipeline.
//!
//! Every number the detectors and recommenders compare against lives here as a
//! named constant. [`AnalysisConfig::default`] uses them as-is; a TOML file can
//! override any subset.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::Result;

// ── Recurrence ────────────────────────────────────────────────

/// Interval standard deviation (days) must be strictly below this.
pub const RECURRENCE_MAX_STD_DEVIATION: f64 = 5.0;
pub const MONTHLY_MIN_INTERVAL: f64 = 25.0;
pub const MONTHLY_MAX_INTERVAL: f64 = 35.0;
pub const BIWEEKLY_MIN_INTERVAL: f64 = 12.0;
pub const BIWEEKLY_MAX_INTERVAL: f64 = 16.0;
pub const RECURRING_TOP_N: usize = 5;

// ── Budget ────────────────────────────────────────────────────

/// Spent/budget ratio above which a category is "near limit".
pub const NEAR_LIMIT_RATIO: Decimal = Decimal::from_parts(80, 0, 0, false, 2);
pub const NO_BUDGET_MULTIPLIER: Decimal = Decimal::from_parts(110, 0, 0, false, 2);
pub const OVER_BUDGET_MULTIPLIER: Decimal = Decimal::from_parts(105, 0, 0, false, 2);
pub const UNDER_BUDGET_MULTIPLIER: Decimal = Decimal::from_parts(120, 0, 0, false, 2);

// ── Insights ──────────────────────────────────────────────────

pub const SAVINGS_RATE_GOOD: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
pub const SAVINGS_RATE_FAIR: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
pub const TOP_MERCHANTS_N: usize = 5;
pub const RECENT_TRANSACTIONS_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    pub max_std_deviation: f64,
    pub monthly_min_interval: f64,
    pub monthly_max_interval: f64,
    pub biweekly_min_interval: f64,
    pub biweekly_max_interval: f64,
    /// How many recurring merchants to keep after ranking
    pub top_n: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            max_std_deviation: RECURRENCE_MAX_STD_DEVIATION,
            monthly_min_interval: MONTHLY_MIN_INTERVAL,
            monthly_max_interval: MONTHLY_MAX_INTERVAL,
            biweekly_min_interval: BIWEEKLY_MIN_INTERVAL,
            biweekly_max_interval: BIWEEKLY_MAX_INTERVAL,
            top_n: RECURRING_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub near_limit_ratio: Decimal,
    pub no_budget_multiplier: Decimal,
    pub over_budget_multiplier: Decimal,
    pub under_budget_multiplier: Decimal,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            near_limit_ratio: NEAR_LIMIT_RATIO,
            no_budget_multiplier: NO_BUDGET_MULTIPLIER,
            over_budget_multiplier: OVER_BUDGET_MULTIPLIER,
            under_budget_multiplier: UNDER_BUDGET_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Savings rate (percent) at or above which the month counts as a success
    pub savings_rate_good: Decimal,
    /// Savings rate (percent) at or above which the month is informational only
    pub savings_rate_fair: Decimal,
    pub top_merchants: usize,
    pub recent_transactions: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            savings_rate_good: SAVINGS_RATE_GOOD,
            savings_rate_fair: SAVINGS_RATE_FAIR,
            top_merchants: TOP_MERCHANTS_N,
            recent_transactions: RECENT_TRANSACTIONS_N,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub recurrence: RecurrenceConfig,
    pub budget: BudgetConfig,
    pub insights: InsightConfig,
}

impl AnalysisConfig {
    /// Parse a TOML document. Missing tables and keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let r = &self.recurrence;
        if r.monthly_min_interval > r.monthly_max_interval {
            return Err(crate::Error::Config(
                "recurrence.monthly_min_interval exceeds monthly_max_interval".into(),
            ));
        }
        if r.biweekly_min_interval > r.biweekly_max_interval {
            return Err(crate::Error::Config(
                "recurrence.biweekly_min_interval exceeds biweekly_max_interval".into(),
            ));
        }
        if self.insights.savings_rate_fair > self.insights.savings_rate_good {
            return Err(crate::Error::Config(
                "insights.savings_rate_fair exceeds savings_rate_good".into(),
            ));
        }
        Ok(())
    }
}
