//! Report, profile and ledger listing commands

use anyhow::{Context, Result};
use chrono::Local;
use moneylytics_core::report::{format_budget_limits, format_money};
use moneylytics_core::{db::Database, Assistant, ReportPeriod};

use super::truncate;

pub fn cmd_report(assistant: &Assistant, user_id: i64, period: &str, json: bool) -> Result<()> {
    let period: ReportPeriod = period.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let report = assistant
        .period_report(user_id, period)
        .with_context(|| format!("Failed to build {} report for user {}", period, user_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.text);
    }

    Ok(())
}

pub fn cmd_profile(db: &Database, user_id: i64) -> Result<()> {
    let user = db
        .get_user(user_id)?
        .with_context(|| format!("User {} not found", user_id))?;
    let expenses = db.count_expenses(user_id)?;

    println!("👤 {} (id {})", user.first_name, user.id);
    if let Some(username) = &user.username {
        println!("   Username: @{}", username);
    }
    println!(
        "   Currency: {}",
        user.currency.as_deref().unwrap_or("not chosen")
    );
    println!("   State: {}", user.conversation_state);
    println!(
        "   Joined: {}",
        user.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!("   Expenses: {}", expenses);
    println!();
    println!("{}", format_budget_limits(&user));

    Ok(())
}

pub fn cmd_expenses(db: &Database, user_id: i64, limit: i64) -> Result<()> {
    let user = db
        .get_user(user_id)?
        .with_context(|| format!("User {} not found", user_id))?;
    let expenses = db.recent_expenses(user_id, limit.max(1))?;

    if expenses.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    let symbol = user.currency_symbol();
    println!(
        "{:<6} {:<17} {:>14}  {:<14} Description",
        "ID", "Date", "Amount", "Category"
    );
    println!("{}", "─".repeat(72));
    for expense in &expenses {
        println!(
            "{:<6} {:<17} {:>14}  {:<14} {}",
            expense.id,
            expense
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            format_money(expense.amount, &symbol),
            truncate(&expense.category, 14),
            truncate(expense.description.as_deref().unwrap_or(""), 30)
        );
    }
    println!();
    println!("{} expense(s) shown", expenses.len());

    Ok(())
}
