//! Grouped sums every later stage reads from.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Budget, CategoryKey, TransactionRecord, YearMonth};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: CategoryKey,
    /// Sum of expense magnitudes; income never counts here
    pub spent: Decimal,
    pub budget: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account: String,
    /// Net of every amount on the account
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantSpend {
    pub merchant: String,
    pub spent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Descending by spend, ties by category name
    pub category_spend: Vec<CategorySpend>,
    /// Ascending by account name
    pub account_balances: Vec<AccountBalance>,
    /// Chronological
    pub monthly_buckets: Vec<MonthlyBucket>,
    /// Expense magnitude per (category, month)
    pub category_monthly: BTreeMap<(CategoryKey, YearMonth), Decimal>,
    /// Expense magnitude per merchant description
    pub merchant_spend: BTreeMap<String, Decimal>,
}

impl Aggregates {
    pub fn net_cashflow(&self) -> Decimal {
        self.total_income - self.total_expenses
    }

    /// Attach each category's budget limit, if the map has one.
    pub fn with_budget(mut self, budget: &Budget) -> Self {
        for entry in &mut self.category_spend {
            entry.budget = budget.get(entry.category.name());
        }
        self
    }

    /// Highest-spend merchants, descending, ties by name.
    pub fn top_merchants(&self, n: usize) -> Vec<MerchantSpend> {
        let mut merchants: Vec<MerchantSpend> = self
            .merchant_spend
            .iter()
            .map(|(merchant, spent)| MerchantSpend {
                merchant: merchant.clone(),
                spent: *spent,
            })
            .collect();
        merchants.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.merchant.cmp(&b.merchant)));
        merchants.truncate(n);
        merchants
    }

    pub fn latest_bucket(&self) -> Option<&MonthlyBucket> {
        self.monthly_buckets.last()
    }

    /// Each category's spend in its own most recent month with spend.
    /// Budgets are monthly limits, so this is what they are measured against.
    /// Descending by spend, ties by category name.
    pub fn latest_category_spend(&self) -> Vec<CategorySpend> {
        let mut latest: BTreeMap<&CategoryKey, Decimal> = BTreeMap::new();
        // Keys sort by (category, month), so the last write per category wins
        for ((category, _), spent) in &self.category_monthly {
            latest.insert(category, *spent);
        }
        let mut out: Vec<CategorySpend> = self
            .category_spend
            .iter()
            .filter_map(|c| {
                latest.get(&c.category).map(|spent| CategorySpend {
                    category: c.category.clone(),
                    spent: *spent,
                    budget: c.budget,
                })
            })
            .collect();
        out.sort_by(|a, b| {
            b.spent
                .cmp(&a.spent)
                .then_with(|| a.category.name().cmp(b.category.name()))
        });
        out
    }
}

#[derive(Default)]
struct MonthTotals {
    income: Decimal,
    expense: Decimal,
    net: Decimal,
}

/// Single pass over the records. Zero amounts touch no income or expense
/// total but still land in their account and month.
pub fn aggregate(records: &[TransactionRecord]) -> Aggregates {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut by_category: BTreeMap<CategoryKey, Decimal> = BTreeMap::new();
    let mut by_account: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut by_month: BTreeMap<YearMonth, MonthTotals> = BTreeMap::new();
    let mut category_monthly: BTreeMap<(CategoryKey, YearMonth), Decimal> = BTreeMap::new();
    let mut merchant_spend: BTreeMap<String, Decimal> = BTreeMap::new();

    for txn in records {
        let month = YearMonth::of(txn.date);

        *by_account.entry(txn.account.clone()).or_default() += txn.amount;

        let bucket = by_month.entry(month).or_default();
        bucket.net += txn.amount;

        if txn.is_income() {
            total_income += txn.amount;
            bucket.income += txn.amount;
        } else if txn.is_expense() {
            let spent = txn.abs_amount();
            total_expenses += spent;
            bucket.expense += spent;
            *by_category.entry(txn.category.clone()).or_default() += spent;
            *category_monthly
                .entry((txn.category.clone(), month))
                .or_default() += spent;
            *merchant_spend.entry(txn.description.clone()).or_default() += spent;
        }
    }

    let mut category_spend: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(category, spent)| CategorySpend {
            category,
            spent,
            budget: None,
        })
        .collect();
    category_spend.sort_by(|a, b| {
        b.spent
            .cmp(&a.spent)
            .then_with(|| a.category.name().cmp(b.category.name()))
    });

    let account_balances = by_account
        .into_iter()
        .map(|(account, balance)| AccountBalance { account, balance })
        .collect();

    // BTreeMap iteration is already chronological
    let monthly_buckets = by_month
        .into_iter()
        .map(|(month, t)| MonthlyBucket {
            month,
            income: t.income,
            expense: t.expense,
            net: t.net,
        })
        .collect::<Vec<_>>();

    debug!(
        records = records.len(),
        categories = category_spend.len(),
        months = monthly_buckets.len(),
        "aggregated transactions"
    );

    Aggregates {
        total_income,
        total_expenses,
        category_spend,
        account_balances,
        monthly_buckets,
        category_monthly,
        merchant_spend,
    }
}
