#![allow(clippy::unwrap_used)]

use cashlens::budget::{apply_suggestions, BudgetStatus, OverallStatus, Selection};
use cashlens::insights::Severity;
use cashlens::recurring::Frequency;
use cashlens::{analyze_rows, AnalysisConfig, Budget, RawTransaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn statement() -> Vec<RawTransaction> {
    serde_json::from_str(
        r#"[
        {"date": "2024-01-01", "amount": 4200, "description": "Payroll", "category": "Income", "account": "Checking"},
        {"date": "2024-01-01", "amount": -15.00, "description": "Netflix", "category": "Entertainment", "account": "Visa"},
        {"date": "2024-01-03", "amount": "-1,450.00", "description": "Landlord", "category": "Rent", "account": "Checking"},
        {"date": "2024-01-05", "amount": "-100.00", "description": "Grocer", "category": "Food", "account": "Visa"},
        {"date": "2024-01-19", "amount": "(42.10)", "description": "Shell", "category": "Auto", "account": "Visa"},
        {"date": "2024-02-01", "amount": 4200, "description": "Payroll", "category": "Income", "account": "Checking"},
        {"date": "2024-02-01", "amount": -15.00, "description": "Netflix", "category": "Entertainment", "account": "Visa"},
        {"date": "2024-02-03", "amount": "-1,450.00", "description": "Landlord", "category": "Rent", "account": "Checking"},
        {"date": "2024-02-05", "amount": "-110.00", "description": "Grocer", "category": "Food", "account": "Visa"},
        {"date": "02/11/2024", "amount": "-$30.00", "description": "Shell", "category": "Auto", "account": "Visa"},
        {"date": "2024-02-20", "amount": -60, "description": "Bookshop", "account": "Visa"},
        {"date": "2024-03-03", "amount": -15.00, "description": "Netflix", "category": "Entertainment", "account": "Visa"},
        {"date": "", "amount": -5, "description": "Broken row", "account": "Visa"},
        {"date": "2024-03-04", "description": "No amount", "account": "Visa"}
    ]"#,
    )
    .unwrap()
}

#[test]
fn test_full_report() {
    let budget = Budget::from_pairs([("Food", dec!(100)), ("Rent", dec!(5000))]).unwrap();
    let report = analyze_rows(&statement(), &budget, &AnalysisConfig::default());

    assert_eq!(report.rejected_rows, 2);
    assert_eq!(report.total_income, dec!(8400));
    assert_eq!(report.total_expenses, dec!(3287.10));
    assert_eq!(report.net_cashflow, report.total_income - report.total_expenses);

    let by_category: Decimal = report.category_spend.iter().map(|c| c.spent).sum();
    assert_eq!(by_category, report.total_expenses);
    let by_account: Decimal = report.account_balances.iter().map(|a| a.balance).sum();
    assert_eq!(by_account, report.net_cashflow);

    assert_eq!(report.category_spend[0].category.name(), "Rent");
    assert!(report
        .category_spend
        .iter()
        .any(|c| c.category.is_uncategorized() && c.spent == dec!(60)));

    let netflix = report
        .recurring_merchants
        .iter()
        .find(|r| r.merchant == "Netflix")
        .unwrap();
    assert_eq!(netflix.frequency, Some(Frequency::Monthly));
    assert_eq!(netflix.average_amount, dec!(15.00));

    let food = report
        .budget_suggestions
        .iter()
        .find(|s| s.category.name() == "Food")
        .unwrap();
    // February's 110 against a 100 limit, not the 210 spent across both months
    assert_eq!(food.spent, dec!(110));
    assert_eq!(food.status, BudgetStatus::OverBudget);
    assert_eq!(food.suggested, dec!(115.50));

    let rent = report
        .budget_suggestions
        .iter()
        .find(|s| s.category.name() == "Rent")
        .unwrap();
    assert_eq!(rent.status, BudgetStatus::OnTrack);
    assert_eq!(rent.percent_used, 29);
    assert_eq!(rent.remaining, Some(dec!(3550)));

    let overview = &report.budget_overview;
    assert_eq!(overview.total_spent, dec!(1665));
    assert_eq!(overview.status, OverallStatus::UnderBudget);
    assert_eq!(overview.difference, dec!(3435));
    let notes: Vec<(&str, String)> = overview
        .needs_attention
        .iter()
        .map(|a| (a.category.name(), a.note()))
        .collect();
    assert_eq!(
        notes,
        vec![
            ("Food", "over budget by $10.00".to_string()),
            ("Uncategorized", "needs budget".to_string()),
            ("Auto", "needs budget".to_string()),
            ("Entertainment", "needs budget".to_string()),
        ]
    );
}

#[test]
fn test_insights_order_and_text() {
    let report = analyze_rows(&statement(), &Budget::new(), &AnalysisConfig::default());
    let titles: Vec<&str> = report.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Monthly Spending Trend",
            "Biggest Spending Increase",
            "Biggest Spending Decrease",
            "Top Merchant Spending",
            "Recurring Expenses",
        ]
    );
    assert_eq!(
        report.insights[1].description,
        "Your spending on Food increased by 10.0% from last month."
    );
    assert_eq!(report.insights[2].severity, Severity::Success);
    assert_eq!(
        report.insights[3].description,
        "Your top merchant is Landlord, where you've spent $2,900.00."
    );
}

#[test]
fn test_accept_suggestions_round_trip() {
    let budget = Budget::from_pairs([("Rent", dec!(5000))]).unwrap();
    let config = AnalysisConfig::default();
    let report = analyze_rows(&statement(), &budget, &config);

    let updated =
        apply_suggestions(&budget, &report.budget_suggestions, Selection::Category("Food"))
            .unwrap();
    assert_eq!(updated.get("Food"), Some(dec!(121.00)));
    assert_eq!(updated.get("Rent"), Some(dec!(5000)));

    let rerun = analyze_rows(&statement(), &updated, &config);
    let food = rerun
        .budget_suggestions
        .iter()
        .find(|s| s.category.name() == "Food")
        .unwrap();
    // 110 of 121 is past the 80% mark
    assert_eq!(food.status, BudgetStatus::NearLimit);
    assert_eq!(food.suggested, dec!(121.00));
}

#[test]
fn test_reruns_are_identical() {
    let config = AnalysisConfig::default();
    let first = analyze_rows(&statement(), &Budget::new(), &config);
    let second = analyze_rows(&statement(), &Budget::new(), &config);
    assert_eq!(first, second);
}

#[test]
fn test_config_changes_thresholds() {
    let config = AnalysisConfig::from_toml_str(
        r#"
        [budget]
        no_budget_multiplier = "1.50"
        "#,
    )
    .unwrap();
    let report = analyze_rows(&statement(), &Budget::new(), &config);
    let food = report
        .budget_suggestions
        .iter()
        .find(|s| s.category.name() == "Food")
        .unwrap();
    assert_eq!(food.suggested, dec!(165.00));
}

#[test]
fn test_empty_input_is_valid() {
    let report = analyze_rows(&[], &Budget::new(), &AnalysisConfig::default());
    assert_eq!(report.total_income, Decimal::ZERO);
    assert!(report.insights.is_empty());
    assert_eq!(report.rejected_rows, 0);
}
