//! Month-over-month movement, per-category movement and savings rate.
//!
//! Every percentage uses the earlier period as its denominator. When that
//! denominator is zero the fact is left out (`None`) instead of producing a
//! bogus number.

use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregate::{Aggregates, MonthlyBucket};
use crate::models::{CategoryKey, YearMonth};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOverMonth {
    pub previous: YearMonth,
    pub current: YearMonth,
    pub previous_expense: Decimal,
    pub current_expense: Decimal,
    pub delta: Decimal,
    pub delta_percent: Decimal,
}

impl MonthOverMonth {
    pub fn is_increase(&self) -> bool {
        self.delta > Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDelta {
    pub category: CategoryKey,
    pub previous: YearMonth,
    pub current: YearMonth,
    pub previous_spend: Decimal,
    pub current_spend: Decimal,
    pub delta: Decimal,
    pub delta_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsRate {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    /// Percent of income not spent; negative when spending exceeded income
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub month: YearMonth,
    pub spent: Decimal,
}

/// One category's spend for every month in the data set, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySeries {
    pub category: CategoryKey,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendReport {
    pub overall: Option<MonthOverMonth>,
    /// Every category with two comparable months, by category name
    pub category_deltas: Vec<CategoryDelta>,
    pub biggest_increase: Option<CategoryDelta>,
    pub biggest_decrease: Option<CategoryDelta>,
    pub savings_rate: Option<SavingsRate>,
    pub category_series: Vec<CategorySeries>,
}

pub fn analyze_trends(agg: &Aggregates) -> TrendReport {
    let overall = overall_trend(&agg.monthly_buckets);
    let category_deltas = category_deltas(&agg.category_monthly);
    let biggest_increase = biggest_increase(&category_deltas).cloned();
    let biggest_decrease = biggest_decrease(&category_deltas).cloned();
    let savings_rate = savings_rate(&agg.monthly_buckets);
    let category_series = category_series(agg);

    debug!(
        has_overall = overall.is_some(),
        category_deltas = category_deltas.len(),
        has_savings_rate = savings_rate.is_some(),
        "analyzed trends"
    );

    TrendReport {
        overall,
        category_deltas,
        biggest_increase,
        biggest_decrease,
        savings_rate,
        category_series,
    }
}

/// `(current - previous) / previous * 100`, or `None` when `previous` is zero.
pub fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    (current - previous)
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
}

fn chronological(buckets: &[MonthlyBucket]) -> Vec<&MonthlyBucket> {
    let mut sorted: Vec<&MonthlyBucket> = buckets.iter().collect();
    sorted.sort_by_key(|b| b.month);
    sorted
}

/// Expense change between the two most recent months.
pub fn overall_trend(buckets: &[MonthlyBucket]) -> Option<MonthOverMonth> {
    let sorted = chronological(buckets);
    let [.., prev, last] = sorted.as_slice() else {
        return None;
    };
    let delta_percent = percent_change(prev.expense, last.expense)?;
    Some(MonthOverMonth {
        previous: prev.month,
        current: last.month,
        previous_expense: prev.expense,
        current_expense: last.expense,
        delta: last.expense - prev.expense,
        delta_percent,
    })
}

/// Per category, the change between its two most recent months with spend.
pub fn category_deltas(
    category_monthly: &BTreeMap<(CategoryKey, YearMonth), Decimal>,
) -> Vec<CategoryDelta> {
    let mut by_category: BTreeMap<&CategoryKey, Vec<(YearMonth, Decimal)>> = BTreeMap::new();
    for ((category, month), spent) in category_monthly {
        by_category
            .entry(category)
            .or_default()
            .push((*month, *spent));
    }

    let mut deltas: Vec<CategoryDelta> = by_category
        .into_iter()
        .filter_map(|(category, mut months)| {
            months.sort_by_key(|(m, _)| *m);
            let [.., (prev_month, prev_spend), (cur_month, cur_spend)] = months.as_slice() else {
                return None;
            };
            let delta_percent = percent_change(*prev_spend, *cur_spend)?;
            Some(CategoryDelta {
                category: category.clone(),
                previous: *prev_month,
                current: *cur_month,
                previous_spend: *prev_spend,
                current_spend: *cur_spend,
                delta: *cur_spend - *prev_spend,
                delta_percent,
            })
        })
        .collect();
    deltas.sort_by(|a, b| a.category.name().cmp(b.category.name()));
    deltas
}

/// Larger recent spend first, then category name, for equal percentages.
fn tie_break(a: &CategoryDelta, b: &CategoryDelta) -> Ordering {
    b.current_spend
        .cmp(&a.current_spend)
        .then_with(|| a.category.name().cmp(b.category.name()))
}

pub fn biggest_increase(deltas: &[CategoryDelta]) -> Option<&CategoryDelta> {
    deltas
        .iter()
        .filter(|d| d.delta_percent > Decimal::ZERO)
        .min_by(|a, b| b.delta_percent.cmp(&a.delta_percent).then_with(|| tie_break(a, b)))
}

pub fn biggest_decrease(deltas: &[CategoryDelta]) -> Option<&CategoryDelta> {
    deltas
        .iter()
        .filter(|d| d.delta_percent < Decimal::ZERO)
        .min_by(|a, b| a.delta_percent.cmp(&b.delta_percent).then_with(|| tie_break(a, b)))
}

/// Savings rate of the most recent month; `None` without income that month.
pub fn savings_rate(buckets: &[MonthlyBucket]) -> Option<SavingsRate> {
    let last = *chronological(buckets).last()?;
    let rate = (last.income - last.expense)
        .checked_div(last.income)?
        .checked_mul(HUNDRED)?;
    Some(SavingsRate {
        month: last.month,
        income: last.income,
        expense: last.expense,
        rate,
    })
}

/// Zero-filled monthly spend per category, categories in spend order.
pub fn category_series(agg: &Aggregates) -> Vec<CategorySeries> {
    let months: Vec<YearMonth> = chronological(&agg.monthly_buckets)
        .into_iter()
        .map(|b| b.month)
        .collect();

    agg.category_spend
        .iter()
        .map(|c| CategorySeries {
            category: c.category.clone(),
            points: months
                .iter()
                .map(|month| SeriesPoint {
                    month: *month,
                    spent: agg
                        .category_monthly
                        .get(&(c.category.clone(), *month))
                        .copied()
                        .unwrap_or(Decimal::ZERO),
                })
                .collect(),
        })
        .collect()
}
