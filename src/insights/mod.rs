//! Human-readable findings built from the trend, merchant and recurrence
//! results, in a fixed order. A finding whose inputs are missing is skipped.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::MerchantSpend;
use crate::config::InsightConfig;
use crate::format::{format_amount, format_percent};
use crate::models::CategoryKey;
use crate::recurring::RecurrenceCandidate;
use crate::trends::{CategoryDelta, MonthOverMonth, SavingsRate, TrendReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The report data an external chart should draw next to an insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum ChartRef {
    /// `monthly_buckets`
    SpendingTrend,
    /// The named entry of `category_trends`
    CategoryTrend(CategoryKey),
    /// `top_merchants`
    TopMerchants,
    /// The latest entry of `monthly_buckets`
    SavingsRate,
    /// `recurring_merchants`
    RecurringExpenses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub actionable: String,
    pub chart: ChartRef,
}

/// Everything the generator reads. Borrowed so the caller keeps ownership.
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    pub trends: &'a TrendReport,
    pub top_merchants: &'a [MerchantSpend],
    pub recurring: &'a [RecurrenceCandidate],
}

pub fn generate(inputs: InsightInputs<'_>, config: &InsightConfig) -> Vec<Insight> {
    let insights: Vec<Insight> = [
        inputs.trends.overall.as_ref().map(spending_trend),
        inputs.trends.biggest_increase.as_ref().map(biggest_increase),
        inputs.trends.biggest_decrease.as_ref().map(biggest_decrease),
        inputs.top_merchants.first().map(top_merchant),
        inputs
            .trends
            .savings_rate
            .as_ref()
            .map(|s| savings_rate(s, config)),
        recurring_expenses(inputs.recurring),
    ]
    .into_iter()
    .flatten()
    .collect();

    debug!(insights = insights.len(), "generated insights");
    insights
}

fn spending_trend(t: &MonthOverMonth) -> Insight {
    let pct = format_percent(t.delta_percent.abs());
    if t.is_increase() {
        Insight {
            title: "Monthly Spending Trend".into(),
            description: format!("Your spending increased by {pct} from last month."),
            severity: Severity::Warning,
            actionable: "Review your recent expenses to identify areas where you can cut back."
                .into(),
            chart: ChartRef::SpendingTrend,
        }
    } else {
        let description = if t.delta.is_zero() {
            "Your spending was unchanged from last month.".to_string()
        } else {
            format!("Your spending decreased by {pct} from last month.")
        };
        Insight {
            title: "Monthly Spending Trend".into(),
            description,
            severity: Severity::Success,
            actionable: "Great job managing your spending! Keep up the good work.".into(),
            chart: ChartRef::SpendingTrend,
        }
    }
}

fn biggest_increase(d: &CategoryDelta) -> Insight {
    Insight {
        title: "Biggest Spending Increase".into(),
        description: format!(
            "Your spending on {} increased by {} from last month.",
            d.category,
            format_percent(d.delta_percent)
        ),
        severity: Severity::Warning,
        actionable: format!(
            "Consider setting a budget for {} to keep your spending in check.",
            d.category
        ),
        chart: ChartRef::CategoryTrend(d.category.clone()),
    }
}

fn biggest_decrease(d: &CategoryDelta) -> Insight {
    Insight {
        title: "Biggest Spending Decrease".into(),
        description: format!(
            "Your spending on {} decreased by {} from last month.",
            d.category,
            format_percent(d.delta_percent.abs())
        ),
        severity: Severity::Success,
        actionable: "Great job reducing your spending in this category!".into(),
        chart: ChartRef::CategoryTrend(d.category.clone()),
    }
}

fn top_merchant(m: &MerchantSpend) -> Insight {
    Insight {
        title: "Top Merchant Spending".into(),
        description: format!(
            "Your top merchant is {}, where you've spent {}.",
            m.merchant,
            format_amount(m.spent)
        ),
        severity: Severity::Info,
        actionable: "Consider if your spending at this merchant aligns with your financial goals."
            .into(),
        chart: ChartRef::TopMerchants,
    }
}

fn savings_rate(s: &SavingsRate, config: &InsightConfig) -> Insight {
    let (severity, actionable) = if s.rate >= config.savings_rate_good {
        (
            Severity::Success,
            "Excellent savings rate! Consider investing your savings for long-term growth.",
        )
    } else if s.rate >= config.savings_rate_fair {
        (
            Severity::Info,
            "Good start! Try to increase your savings rate to 20% for better financial security.",
        )
    } else {
        (
            Severity::Warning,
            "Try to increase your savings rate by reducing expenses or increasing income.",
        )
    };
    Insight {
        title: "Savings Rate".into(),
        description: format!(
            "Your savings rate for {} was {} of your income.",
            s.month.label(),
            format_percent(s.rate)
        ),
        severity,
        actionable: actionable.into(),
        chart: ChartRef::SavingsRate,
    }
}

fn recurring_expenses(recurring: &[RecurrenceCandidate]) -> Option<Insight> {
    if recurring.is_empty() {
        return None;
    }
    let total: Decimal = recurring.iter().map(|r| r.average_amount).sum();
    Some(Insight {
        title: "Recurring Expenses".into(),
        description: format!(
            "You have approximately {} in recurring monthly expenses.",
            format_amount(total)
        ),
        severity: Severity::Info,
        actionable:
            "Review your subscriptions and recurring expenses to see if there are any you can eliminate."
                .into(),
        chart: ChartRef::RecurringExpenses,
    })
}
