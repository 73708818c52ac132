//! Report formatting
//!
//! Pure text rendering of [`PeriodSummary`] values. Nothing here touches the
//! database, so every layout can be tested from literal summaries.

use std::fmt::Write;

use crate::aggregate::PeriodSummary;
use crate::models::{Expense, User};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━";

/// Format an amount with two decimals followed by the currency symbol
pub fn format_money(amount: f64, symbol: &str) -> String {
    if symbol.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{:.2} {}", amount, symbol)
    }
}

/// Upper-case the first letter of a category label
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn expense_line(expense: &Expense, symbol: &str) -> String {
    match expense.description.as_deref() {
        Some(description) if !description.is_empty() => format!(
            "• {} - {}",
            format_money(expense.amount, symbol),
            description
        ),
        _ => format!("• {}", format_money(expense.amount, symbol)),
    }
}

/// Render the full period report
///
/// Layout: title, one block per category (ascending by name) listing its
/// expenses by descending amount, the total, then a highlight line for the
/// largest expense of the whole period.
pub fn format_report(summary: &PeriodSummary, title: &str, largest_label: &str) -> String {
    let symbol = summary.currency_symbol.as_str();
    let mut out = String::new();

    let _ = writeln!(out, "{}", title);

    for (category, totals) in &summary.categories {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} ({}) — {}:",
            capitalize(category),
            totals.count,
            format_money(totals.subtotal, symbol)
        );

        let mut expenses: Vec<&Expense> = totals.expenses.iter().collect();
        expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        for expense in expenses {
            let _ = writeln!(out, "{}", expense_line(expense, symbol));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = writeln!(out, "Total: {}", format_money(summary.total, symbol));

    let largest = &summary.largest;
    let what = match largest.description.as_deref() {
        Some(description) if !description.is_empty() => {
            format!("{} ({})", capitalize(&largest.category), description)
        }
        _ => capitalize(&largest.category),
    };
    let _ = write!(
        out,
        "{}: {} — {}",
        largest_label,
        format_money(largest.amount, symbol),
        what
    );

    out
}

/// Render the categories view: one line per category with its share of the total
///
/// Categories are listed from biggest to smallest subtotal, ties by name.
pub fn format_category_shares(summary: &PeriodSummary, title: &str) -> String {
    let symbol = summary.currency_symbol.as_str();
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out);

    let mut rows: Vec<(&String, f64, usize)> = summary
        .categories
        .iter()
        .map(|(name, totals)| (name, totals.subtotal, totals.count))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (name, subtotal, count) in rows {
        let _ = writeln!(
            out,
            "{} ({}): {} — {:.1}%",
            capitalize(name),
            count,
            format_money(subtotal, symbol),
            summary.share(name)
        );
    }

    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = write!(out, "Total: {}", format_money(summary.total, symbol));
    out
}

/// Render the user's stored budget limits
pub fn format_budget_limits(user: &User) -> String {
    let symbol = user.currency_symbol();
    let show = |limit: Option<f64>| match limit {
        Some(value) => format_money(value, &symbol),
        None => "not set".to_string(),
    };

    format!(
        "💰 Your budget limits:\nDaily: {}\nWeekly: {}",
        show(user.daily_budget),
        show(user.weekly_budget)
    )
}
