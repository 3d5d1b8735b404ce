//! Budget status and suggested limits per category.
//!
//! Suggestions are computed, never applied: [`apply_suggestions`] returns a new
//! [`Budget`] and leaves committing it to the caller.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::CategorySpend;
use crate::config::BudgetConfig;
use crate::error::Result;
use crate::format::{format_amount, round_currency};
use crate::models::{Budget, CategoryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    #[serde(rename = "Over budget")]
    OverBudget,
    #[serde(rename = "Near limit")]
    NearLimit,
    #[serde(rename = "On track")]
    OnTrack,
    #[serde(rename = "No budget set")]
    NoBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverBudget => "Over budget",
            Self::NearLimit => "Near limit",
            Self::OnTrack => "On track",
            Self::NoBudget => "No budget set",
        }
    }

    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::OverBudget | Self::NoBudget)
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSuggestion {
    pub category: CategoryKey,
    pub spent: Decimal,
    /// Active limit; zero limits count as unset
    pub budget: Option<Decimal>,
    pub status: BudgetStatus,
    pub suggested: Decimal,
    /// Whole percent of the budget used, capped at 100
    pub percent_used: u32,
    /// `budget - spent`; negative when over. `None` without a budget.
    pub remaining: Option<Decimal>,
}

/// Whole-budget verdict. Spending exactly the total counts as under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    #[serde(rename = "over budget")]
    OverBudget,
    #[serde(rename = "under budget")]
    UnderBudget,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverBudget => "over budget",
            Self::UnderBudget => "under budget",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category with no budget, or one it has overrun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttentionItem {
    pub category: CategoryKey,
    pub spent: Decimal,
    /// `None` when the category has no budget
    pub over_by: Option<Decimal>,
}

impl AttentionItem {
    /// "needs budget" or "over budget by $12.34"
    pub fn note(&self) -> String {
        match self.over_by {
            None => "needs budget".to_string(),
            Some(over) => format!("over budget by {}", format_amount(over)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    /// Sum of every limit in the budget map, including categories with no spend
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    /// Whole percent, capped at 100; zero when no budget is set
    pub percent_used: u32,
    pub status: OverallStatus,
    /// `|total_budget - total_spent|`
    pub difference: Decimal,
    /// Categories with no budget or over budget, in spend order
    pub needs_attention: Vec<AttentionItem>,
}

/// Which suggestions [`apply_suggestions`] writes into the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    All,
    Category(&'a str),
}

pub fn status(spent: Decimal, budget: Option<Decimal>, config: &BudgetConfig) -> BudgetStatus {
    let Some(limit) = budget.filter(|b| *b > Decimal::ZERO) else {
        return BudgetStatus::NoBudget;
    };
    if spent > limit {
        BudgetStatus::OverBudget
    } else if spent / limit > config.near_limit_ratio {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::OnTrack
    }
}

/// First matching rule wins:
/// no budget → spent × 1.10; over → spent × 1.05; near limit → keep budget;
/// otherwise → spent × 1.20. Rounded to cents, halves away from zero.
pub fn suggest(spent: Decimal, budget: Option<Decimal>, config: &BudgetConfig) -> Decimal {
    // Saturate rather than panic on absurd spend; the near-limit ratio is at most 1
    let raw = match budget.filter(|b| *b > Decimal::ZERO) {
        None => spent.saturating_mul(config.no_budget_multiplier),
        Some(limit) if spent > limit => spent.saturating_mul(config.over_budget_multiplier),
        Some(limit) if spent / limit > config.near_limit_ratio => limit,
        Some(_) => spent.saturating_mul(config.under_budget_multiplier),
    };
    round_currency(raw)
}

pub fn percent_used(spent: Decimal, budget: Option<Decimal>) -> u32 {
    let Some(limit) = budget.filter(|b| *b > Decimal::ZERO) else {
        return 0;
    };
    // Over budget is capped anyway, and dividing by a tiny limit can overflow
    if spent >= limit {
        return 100;
    }
    (spent / limit * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .min(Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0)
}

/// One suggestion per category with spend, in the order given.
pub fn recommend(
    category_spend: &[CategorySpend],
    budget: &Budget,
    config: &BudgetConfig,
) -> Vec<BudgetSuggestion> {
    let suggestions: Vec<BudgetSuggestion> = category_spend
        .iter()
        .map(|c| {
            let limit = budget.active_limit(c.category.name());
            BudgetSuggestion {
                category: c.category.clone(),
                spent: c.spent,
                budget: limit,
                status: status(c.spent, limit, config),
                suggested: suggest(c.spent, limit, config),
                percent_used: percent_used(c.spent, limit),
                remaining: limit.map(|l| l - c.spent),
            }
        })
        .collect();

    debug!(
        suggestions = suggestions.len(),
        over = suggestions
            .iter()
            .filter(|s| s.status == BudgetStatus::OverBudget)
            .count(),
        "computed budget suggestions"
    );
    suggestions
}

pub fn overview(suggestions: &[BudgetSuggestion], budget: &Budget) -> BudgetOverview {
    let total_budget = budget.total();
    let total_spent: Decimal = suggestions.iter().map(|s| s.spent).sum();
    let total = Some(total_budget).filter(|t| *t > Decimal::ZERO);
    let status = if total_spent > total_budget {
        OverallStatus::OverBudget
    } else {
        OverallStatus::UnderBudget
    };
    BudgetOverview {
        total_budget,
        total_spent,
        percent_used: percent_used(total_spent, total),
        status,
        difference: (total_budget - total_spent).abs(),
        needs_attention: suggestions
            .iter()
            .filter(|s| s.status.needs_attention())
            .map(|s| AttentionItem {
                category: s.category.clone(),
                spent: s.spent,
                over_by: s.budget.map(|limit| s.spent - limit),
            })
            .collect(),
    }
}

/// Copy of `budget` with the selected suggestions written in.
pub fn apply_suggestions(
    budget: &Budget,
    suggestions: &[BudgetSuggestion],
    selection: Selection<'_>,
) -> Result<Budget> {
    let mut updated = budget.clone();
    for s in suggestions {
        let selected = match selection {
            Selection::All => true,
            Selection::Category(name) => s.category.name() == name,
        };
        if selected {
            updated.set(s.category.name(), s.suggested)?;
        }
    }
    Ok(updated)
}
