use anyhow::{Context, Result};
use cashlens::budget::{apply_suggestions, BudgetSuggestion, Selection};
use cashlens::format::format_amount;
use cashlens::insights::Insight;
use cashlens::normalize::{normalize_rows, Normalized};
use cashlens::query::{SortKey, TransactionQuery};
use cashlens::recurring::{detect_recurring, RecurrenceCandidate};
use cashlens::report::analyze_normalized;
use cashlens::{AnalysisConfig, AnalysisReport, Budget, TransactionRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::db::Database;

/// Flags followed by a value. Their values are never taken as file names.
const VALUE_FLAGS: &[&str] = &[
    "--config",
    "--search",
    "--account",
    "--category",
    "--from",
    "--to",
    "--sort",
];

pub(crate) fn as_cli(args: &[String]) -> Result<()> {
    match args[1].as_str() {
        "analyze" | "a" => cli_analyze(&args[2..]),
        "insights" | "i" => cli_insights(&args[2..]),
        "recurring" | "r" => cli_recurring(&args[2..]),
        "transactions" | "t" => cli_transactions(&args[2..]),
        "budget" | "b" => cli_budget(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("cashlens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("cashlens - spending analytics for bank statement exports");
    println!();
    println!("Usage: cashlens <command> [options]");
    println!();
    println!("Commands:");
    println!("  analyze <file>...             Full report: totals, categories, trends, budgets, insights");
    println!("  insights <file>...            Ordered insights only");
    println!("  recurring <file>...           Recurring merchants only");
    println!("  transactions <file>...        List transactions");
    println!("    --search <text>             Match description or category");
    println!("    --account <name>            Only this account");
    println!("    --category <name>           Only this category");
    println!("    --from <YYYY-MM-DD>         On or after this date");
    println!("    --to <YYYY-MM-DD>           On or before this date");
    println!("    --sort <key>                date, amount, description, category or account");
    println!("    --asc                       Ascending (default: descending)");
    println!("  budget list                   Show stored budgets");
    println!("  budget set <category> <amt>   Store a budget limit");
    println!("  budget remove <category>      Delete a budget limit");
    println!("  budget suggest <file>...      Show suggested limits");
    println!("  budget accept <file>...       Store suggested limits");
    println!("    --category <name>           Only this category");
    println!();
    println!("Input files: .json parser payloads or CSV with a header row");
    println!("(date, amount, description, category, account).");
    println!();
    println!("Options:");
    println!("  --json                        Print JSON instead of text");
    println!("  --strict                      Fail if any row cannot be read");
    println!("  --config <file.toml>          Override analysis thresholds");
    println!("  --verbose, -v                 Debug logging to stderr");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with('-') {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_date_flag(args: &[String], name: &str) -> Result<Option<NaiveDate>> {
    flag_value(args, name)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("{name} expects YYYY-MM-DD, got '{s}'"))
        })
        .transpose()
}

fn parse_amount_arg(s: &str) -> Result<Decimal> {
    let cleaned = s.replace(['$', ','], "");
    Decimal::from_str(cleaned.trim()).with_context(|| format!("Not a valid amount: '{s}'"))
}

fn load_config(args: &[String]) -> Result<AnalysisConfig> {
    let path: std::path::PathBuf = match flag_value(args, "--config") {
        Some(p) => p.into(),
        None => {
            let default = crate::get_config_path()?;
            if !default.exists() {
                return Ok(AnalysisConfig::default());
            }
            default
        }
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = AnalysisConfig::from_toml_str(&text)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

fn open_db() -> Result<Database> {
    Database::open(&crate::get_db_path()?)
}

/// Load and normalize every file named on the command line.
fn load_batch(args: &[String], usage: &str) -> Result<Normalized> {
    let files = positionals(args);
    if files.is_empty() {
        anyhow::bail!("Usage: {usage}");
    }
    let paths: Vec<&Path> = files.iter().map(Path::new).collect();
    let rows = crate::import::load_files(&paths)?;
    let batch = normalize_rows(&rows);

    for err in &batch.rejected {
        warn!("{err}");
    }
    if has_flag(args, "--strict") {
        if let Some(first) = batch.rejected.first() {
            anyhow::bail!(
                "{} of {} rows rejected ({first})",
                batch.rejected.len(),
                rows.len()
            );
        }
    }
    Ok(batch)
}

fn build_report(args: &[String], usage: &str) -> Result<AnalysisReport> {
    let config = load_config(args)?;
    let batch = load_batch(args, usage)?;
    let budget = open_db()?.load_budget()?;
    Ok(analyze_normalized(&batch, &budget, &config))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────

fn cli_analyze(args: &[String]) -> Result<()> {
    let report = build_report(args, "cashlens analyze <file>... [--json] [--strict]")?;
    if has_flag(args, "--json") {
        return print_json(&report);
    }
    print!("{}", render_report(&report));
    Ok(())
}

fn cli_insights(args: &[String]) -> Result<()> {
    let report = build_report(args, "cashlens insights <file>... [--json]")?;
    if has_flag(args, "--json") {
        return print_json(&report.insights);
    }
    if report.insights.is_empty() {
        println!("Not enough data for insights");
    } else {
        print!("{}", render_insights(&report.insights));
    }
    Ok(())
}

fn cli_recurring(args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let batch = load_batch(args, "cashlens recurring <file>... [--json]")?;
    let recurring = detect_recurring(&batch.records, &config.recurrence);
    if has_flag(args, "--json") {
        return print_json(&recurring);
    }
    if recurring.is_empty() {
        println!("No recurring merchants found");
    } else {
        print!("{}", render_recurring(&recurring));
    }
    Ok(())
}

fn cli_transactions(args: &[String]) -> Result<()> {
    let batch = load_batch(args, "cashlens transactions <file>... [filters]")?;
    let query = TransactionQuery {
        search: flag_value(args, "--search").map(str::to_string),
        account: flag_value(args, "--account").map(str::to_string),
        category: flag_value(args, "--category").map(str::to_string),
        from: parse_date_flag(args, "--from")?,
        to: parse_date_flag(args, "--to")?,
        sort: flag_value(args, "--sort")
            .map(SortKey::from_str)
            .transpose()?
            .unwrap_or_default(),
        descending: !has_flag(args, "--asc"),
    };
    let matches = query.apply(&batch.records);
    if has_flag(args, "--json") {
        return print_json(&matches);
    }
    if matches.is_empty() {
        println!("No transactions match");
    } else {
        print!("{}", render_transactions(&matches));
    }
    Ok(())
}

fn cli_budget(args: &[String]) -> Result<()> {
    const USAGE: &str = "cashlens budget <list|set|remove|suggest|accept> ...";
    let Some(sub) = args.first() else {
        anyhow::bail!("Usage: {USAGE}");
    };
    let rest = &args[1..];
    match sub.as_str() {
        "list" | "ls" => {
            let budget = open_db()?.load_budget()?;
            if budget.is_empty() {
                println!("No budgets set");
            } else {
                print!("{}", render_budget(&budget));
            }
            Ok(())
        }
        "set" => {
            let pos = positionals(rest);
            let [category, amount] = pos[..] else {
                anyhow::bail!("Usage: cashlens budget set <category> <amount>");
            };
            let amount = parse_amount_arg(amount)?;
            open_db()?.upsert_budget(category, amount)?;
            println!("Budget for {category} set to {}", format_amount(amount));
            Ok(())
        }
        "remove" | "rm" => {
            let pos = positionals(rest);
            let [category] = pos[..] else {
                anyhow::bail!("Usage: cashlens budget remove <category>");
            };
            if open_db()?.delete_budget(category)? {
                println!("Removed budget for {category}");
            } else {
                println!("No budget set for {category}");
            }
            Ok(())
        }
        "suggest" => {
            let report = build_report(rest, "cashlens budget suggest <file>... [--json]")?;
            if has_flag(rest, "--json") {
                return print_json(&report.budget_suggestions);
            }
            print!("{}", render_suggestions(&report.budget_suggestions));
            Ok(())
        }
        "accept" => {
            let report =
                build_report(rest, "cashlens budget accept <file>... [--category <name>]")?;
            let selection = match flag_value(rest, "--category") {
                Some(name) => {
                    if !report
                        .budget_suggestions
                        .iter()
                        .any(|s| s.category.name() == name)
                    {
                        anyhow::bail!("No spending in category '{name}' to suggest a budget for");
                    }
                    Selection::Category(name)
                }
                None => Selection::All,
            };
            let accepted =
                apply_suggestions(&Budget::new(), &report.budget_suggestions, selection)?;
            let count = open_db()?.save_budget(&accepted)?;
            for (category, amount) in accepted.iter() {
                println!("  {category:<24} {:>12}", format_amount(amount));
            }
            println!("Saved {count} budget(s)");
            Ok(())
        }
        other => anyhow::bail!("Unknown budget command: {other} (usage: {USAGE})"),
    }
}

// ── Rendering ────────────────────────────────────────────────

fn rule() -> String {
    "─".repeat(56)
}

fn render_report(r: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("cashlens - {} month(s)\n", r.monthly_buckets.len()));
    out.push_str(&format!("{}\n", rule()));
    out.push_str(&format!("  Income:     {:>14}\n", format_amount(r.total_income)));
    out.push_str(&format!("  Expenses:   {:>14}\n", format_amount(r.total_expenses)));
    out.push_str(&format!("  Net:        {:>14}\n", format_amount(r.net_cashflow)));
    if r.rejected_rows > 0 {
        out.push_str(&format!("  Skipped:    {:>14}\n", format!("{} row(s)", r.rejected_rows)));
    }

    if !r.category_spend.is_empty() {
        out.push_str("\nSpending by Category:\n");
        for c in &r.category_spend {
            let budget = c
                .budget
                .map(|b| format!("of {}", format_amount(b)))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {:<24} {:>12}  {budget}\n",
                c.category.name(),
                format_amount(c.spent)
            ));
        }
    }

    if !r.account_balances.is_empty() {
        out.push_str("\nAccounts:\n");
        for a in &r.account_balances {
            out.push_str(&format!("  {:<24} {:>12}\n", a.account, format_amount(a.balance)));
        }
    }

    if !r.monthly_buckets.is_empty() {
        out.push_str("\nMonthly:\n");
        out.push_str(&format!(
            "  {:<16} {:>12} {:>12} {:>12}\n",
            "Month", "Income", "Expenses", "Net"
        ));
        for b in &r.monthly_buckets {
            out.push_str(&format!(
                "  {:<16} {:>12} {:>12} {:>12}\n",
                b.month.label(),
                format_amount(b.income),
                format_amount(b.expense),
                format_amount(b.net)
            ));
        }
    }

    if !r.top_merchants.is_empty() {
        out.push_str("\nTop Merchants:\n");
        for m in &r.top_merchants {
            out.push_str(&format!("  {:<24} {:>12}\n", m.merchant, format_amount(m.spent)));
        }
    }

    if !r.recurring_merchants.is_empty() {
        out.push_str("\nRecurring:\n");
        out.push_str(&render_recurring(&r.recurring_merchants));
    }

    if !r.budget_suggestions.is_empty() {
        out.push_str("\nBudgets:\n");
        out.push_str(&render_suggestions(&r.budget_suggestions));
        let ov = &r.budget_overview;
        if ov.total_budget > Decimal::ZERO {
            out.push_str(&format!(
                "  Total: {} of {} ({}%), {} by {}\n",
                format_amount(ov.total_spent),
                format_amount(ov.total_budget),
                ov.percent_used,
                ov.status,
                format_amount(ov.difference)
            ));
        }
        for item in &ov.needs_attention {
            out.push_str(&format!("  ! {}: {}\n", item.category.name(), item.note()));
        }
    }

    if !r.recent_transactions.is_empty() {
        out.push_str("\nRecent:\n");
        let recent: Vec<&TransactionRecord> = r.recent_transactions.iter().collect();
        out.push_str(&render_transactions(&recent));
    }

    if !r.insights.is_empty() {
        out.push_str("\nInsights:\n");
        out.push_str(&render_insights(&r.insights));
    }
    out
}

fn render_insights(insights: &[Insight]) -> String {
    let mut out = String::new();
    for i in insights {
        out.push_str(&format!("  [{}] {}\n", i.severity, i.title));
        out.push_str(&format!("      {}\n", i.description));
        out.push_str(&format!("      -> {}\n", i.actionable));
    }
    out
}

fn render_recurring(recurring: &[RecurrenceCandidate]) -> String {
    let mut out = format!(
        "  {:<24} {:<10} {:>12} {:>10} {:>8}\n",
        "Merchant", "Frequency", "Average", "Every", "Charges"
    );
    for r in recurring {
        let frequency = r.frequency.map(|f| f.as_str()).unwrap_or("-");
        out.push_str(&format!(
            "  {:<24} {:<10} {:>12} {:>10} {:>8}\n",
            r.merchant,
            frequency,
            format_amount(r.average_amount),
            format!("{:.1}d", r.mean_interval),
            r.dates.len()
        ));
    }
    out
}

fn render_suggestions(suggestions: &[BudgetSuggestion]) -> String {
    let mut out = format!(
        "  {:<24} {:>12} {:>12} {:>12}  {}\n",
        "Category", "Last Month", "Budget", "Suggested", "Status"
    );
    for s in suggestions {
        let budget = s.budget.map(format_amount).unwrap_or_else(|| "-".into());
        let status = if s.budget.is_some() {
            format!("{} ({}%)", s.status, s.percent_used)
        } else {
            s.status.to_string()
        };
        out.push_str(&format!(
            "  {:<24} {:>12} {:>12} {:>12}  {status}\n",
            s.category.name(),
            format_amount(s.spent),
            budget,
            format_amount(s.suggested)
        ));
    }
    out
}

fn render_transactions(records: &[&TransactionRecord]) -> String {
    let mut out = format!(
        "  {:<10}  {:<28} {:<18} {:<12} {:>12}\n",
        "Date", "Description", "Category", "Account", "Amount"
    );
    for t in records {
        out.push_str(&format!(
            "  {:<10}  {:<28} {:<18} {:<12} {:>12}\n",
            t.date.format("%Y-%m-%d"),
            truncate(&t.description, 28),
            truncate(t.category.name(), 18),
            truncate(&t.account, 12),
            format_amount(t.amount)
        ));
    }
    out
}

fn render_budget(budget: &Budget) -> String {
    let mut out = String::new();
    for (category, amount) in budget.iter() {
        out.push_str(&format!("  {category:<24} {:>12}\n", format_amount(amount)));
    }
    out.push_str(&format!("  {}\n", rule()));
    out.push_str(&format!("  {:<24} {:>12}\n", "Total", format_amount(budget.total())));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
