mod schema;

use anyhow::{Context, Result};
use cashlens::Budget;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

/// Budget limits persisted between runs. The analysis itself never touches
/// this; the CLI loads a [`Budget`] before a run and saves accepted changes.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Failed to read schema version")?;

        // Only one schema exists so far; anything else was written by another build
        if current != schema::CURRENT_VERSION {
            anyhow::bail!(
                "Unsupported budget database schema version {current} (expected {})",
                schema::CURRENT_VERSION
            );
        }
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn load_budget(&self) -> Result<Budget> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, limit_amount FROM budgets ORDER BY category")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut budget = Budget::new();
        for row in rows {
            let (category, amount_str) = row?;
            let amount = Decimal::from_str(&amount_str).with_context(|| {
                format!("Stored budget for '{category}' is not a number: {amount_str}")
            })?;
            budget.set(&category, amount)?;
        }
        Ok(budget)
    }

    pub(crate) fn upsert_budget(&self, category: &str, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(cashlens::Error::InvalidBudget {
                category: category.to_string(),
                amount,
            }
            .into());
        }
        self.conn.execute(
            "INSERT INTO budgets (category, limit_amount, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(category) DO UPDATE SET limit_amount = ?2, updated_at = ?3",
            params![category, amount.to_string(), now()],
        )?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub(crate) fn delete_budget(&self, category: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM budgets WHERE category = ?1", params![category])?;
        Ok(removed > 0)
    }

    /// Write every limit in `budget`. Categories not in `budget` are left alone.
    pub(crate) fn save_budget(&mut self, budget: &Budget) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let stamp = now();
        let mut count = 0;
        for (category, amount) in budget.iter() {
            tx.execute(
                "INSERT INTO budgets (category, limit_amount, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(category) DO UPDATE SET limit_amount = ?2, updated_at = ?3",
                params![category, amount.to_string(), stamp],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
