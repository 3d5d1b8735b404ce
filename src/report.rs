//! One-call entry point that runs the whole pipeline.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info_span};

use crate::aggregate::{aggregate, AccountBalance, CategorySpend, MerchantSpend, MonthlyBucket};
use crate::budget::{self, BudgetOverview, BudgetSuggestion};
use crate::config::AnalysisConfig;
use crate::insights::{self, Insight, InsightInputs};
use crate::models::{Budget, RawTransaction, TransactionRecord};
use crate::normalize::{normalize_rows, Normalized};
use crate::query::recent;
use crate::recurring::{detect_recurring, RecurrenceCandidate};
use crate::trends::{analyze_trends, CategorySeries};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_cashflow: Decimal,
    pub category_spend: Vec<CategorySpend>,
    pub account_balances: Vec<AccountBalance>,
    pub monthly_buckets: Vec<MonthlyBucket>,
    pub recurring_merchants: Vec<RecurrenceCandidate>,
    /// Measured against each category's most recent month with spend
    pub budget_suggestions: Vec<BudgetSuggestion>,
    pub insights: Vec<Insight>,
    pub top_merchants: Vec<MerchantSpend>,
    pub category_trends: Vec<CategorySeries>,
    pub recent_transactions: Vec<TransactionRecord>,
    pub budget_overview: BudgetOverview,
    /// Rows the normalizer turned away; zero when built from typed records
    pub rejected_rows: usize,
}

/// Run every stage over already-typed records.
pub fn analyze(
    records: &[TransactionRecord],
    budget: &Budget,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let _span = info_span!("analyze", records = records.len()).entered();

    let agg = aggregate(records).with_budget(budget);
    let trends = analyze_trends(&agg);
    let recurring_merchants = detect_recurring(records, &config.recurrence);
    let budget_suggestions =
        budget::recommend(&agg.latest_category_spend(), budget, &config.budget);
    let budget_overview = budget::overview(&budget_suggestions, budget);
    let top_merchants = agg.top_merchants(config.insights.top_merchants);

    let insights = insights::generate(
        InsightInputs {
            trends: &trends,
            top_merchants: &top_merchants,
            recurring: &recurring_merchants,
        },
        &config.insights,
    );

    debug!(insights = insights.len(), "report ready");

    AnalysisReport {
        total_income: agg.total_income,
        total_expenses: agg.total_expenses,
        net_cashflow: agg.net_cashflow(),
        category_spend: agg.category_spend,
        account_balances: agg.account_balances,
        monthly_buckets: agg.monthly_buckets,
        recurring_merchants,
        budget_suggestions,
        insights,
        top_merchants,
        category_trends: trends.category_series,
        recent_transactions: recent(records, config.insights.recent_transactions),
        budget_overview,
        rejected_rows: 0,
    }
}

/// Analyze the accepted records of a normalized batch, counting the rest.
pub fn analyze_normalized(
    batch: &Normalized,
    budget: &Budget,
    config: &AnalysisConfig,
) -> AnalysisReport {
    AnalysisReport {
        rejected_rows: batch.rejected.len(),
        ..analyze(&batch.records, budget, config)
    }
}

/// Normalize raw statement rows, then analyze whatever survived.
pub fn analyze_rows(
    rows: &[RawTransaction],
    budget: &Budget,
    config: &AnalysisConfig,
) -> AnalysisReport {
    analyze_normalized(&normalize_rows(rows), budget, config)
}
