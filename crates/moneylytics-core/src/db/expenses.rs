//! Expense ledger operations
//!
//! The ledger is append-only: expenses are inserted and queried, never
//! updated or deleted.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, description, created_at";

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let created_at_str: String = row.get(5)?;
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Append an expense stamped with the current time
    pub fn append_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        self.append_expense_at(user_id, expense, Utc::now())
    }

    /// Append an expense with an explicit timestamp
    ///
    /// Ids come from SQLite's AUTOINCREMENT, so concurrent appends get
    /// distinct, increasing ids and neither write is lost.
    pub fn append_expense_at(
        &self,
        user_id: i64,
        expense: &NewExpense,
        at: DateTime<Utc>,
    ) -> Result<Expense> {
        if !expense.amount.is_finite() || expense.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "expense amount must be positive, got {}",
                expense.amount
            )));
        }
        let category = expense.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(Error::InvalidData("expense category is empty".to_string()));
        }

        let conn = self.conn()?;

        let user_exists = conn
            .query_row("SELECT 1 FROM users WHERE id = ?", params![user_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !user_exists {
            return Err(Error::UserNotFound(user_id));
        }

        let stamp = format_datetime(&at);
        conn.execute(
            "INSERT INTO expenses (user_id, amount, category, description, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, expense.amount, category, expense.description, stamp],
        )?;
        let id = conn.last_insert_rowid();

        info!(user_id, expense_id = id, amount = expense.amount, category = %category, "Expense saved");

        Ok(Expense {
            id,
            user_id,
            amount: expense.amount,
            category,
            description: expense.description.clone(),
            created_at: parse_datetime(&stamp),
        })
    }

    /// All of a user's expenses with `start <= created_at <= end`
    ///
    /// Rows come back in insertion order, but callers must not rely on it.
    pub fn expenses_in_range(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ?1 AND created_at BETWEEN ?2 AND ?3 ORDER BY created_at, id",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(
                params![user_id, format_datetime(&start), format_datetime(&end)],
                row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// A user's expenses in one category within an inclusive range
    pub fn expenses_in_category(
        &self,
        user_id: i64,
        category: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ?1 AND category = ?2 AND created_at BETWEEN ?3 AND ?4 ORDER BY created_at, id",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(
                params![
                    user_id,
                    category.trim().to_lowercase(),
                    format_datetime(&start),
                    format_datetime(&end)
                ],
                row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Most recent expenses for a user, newest first
    pub fn recent_expenses(&self, user_id: i64, limit: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![user_id, limit], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Number of expenses stored for a user
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
