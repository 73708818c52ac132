//! Period aggregation
//!
//! Folds a window of expenses into per-category totals, a grand total and the
//! single largest expense. Callers fetch the window with
//! [`Database::expenses_in_range`](crate::db::Database::expenses_in_range);
//! the order of the input does not affect totals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::Expense;

/// Totals for one category within a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub count: usize,
    pub subtotal: f64,
    pub expenses: Vec<Expense>,
}

/// Aggregated view of a non-empty period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub total: f64,
    /// Keyed by category, iterated in ascending name order
    pub categories: BTreeMap<String, CategorySummary>,
    pub largest: Expense,
    pub currency_symbol: String,
}

impl PeriodSummary {
    pub fn expense_count(&self) -> usize {
        self.categories.values().map(|c| c.count).sum()
    }

    /// Share of the total spent in `category`, in percent
    pub fn share(&self, category: &str) -> f64 {
        match self.categories.get(category) {
            Some(c) if self.total > 0.0 => c.subtotal / self.total * 100.0,
            _ => 0.0,
        }
    }
}

/// Aggregate a window of expenses
///
/// Returns [`Error::EmptyPeriod`] for an empty window. For equal maximum
/// amounts the first expense encountered is the largest.
pub fn aggregate(expenses: &[Expense], currency_symbol: &str) -> Result<PeriodSummary> {
    let mut iter = expenses.iter();
    let first = iter.next().ok_or(Error::EmptyPeriod)?;

    let mut largest = first;
    for expense in iter {
        if expense.amount > largest.amount {
            largest = expense;
        }
    }

    let mut categories: BTreeMap<String, CategorySummary> = BTreeMap::new();
    let mut total = 0.0;
    for expense in expenses {
        total += expense.amount;
        let entry = categories
            .entry(expense.category.clone())
            .or_insert_with(|| CategorySummary {
                count: 0,
                subtotal: 0.0,
                expenses: Vec::new(),
            });
        entry.count += 1;
        entry.subtotal += expense.amount;
        entry.expenses.push(expense.clone());
    }

    Ok(PeriodSummary {
        total,
        categories,
        largest: largest.clone(),
        currency_symbol: currency_symbol.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(id: i64, category: &str, amount: f64) -> Expense {
        Expense {
            id,
            user_id: 1,
            amount,
            category: category.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_totals_and_categories() {
        let expenses = vec![
            expense(1, "food", 10.0),
            expense(2, "food", 5.0),
            expense(3, "transport", 3.0),
        ];

        let summary = aggregate(&expenses, "€").unwrap();

        assert_eq!(summary.total, 18.0);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories["food"].count, 2);
        assert_eq!(summary.categories["food"].subtotal, 15.0);
        assert_eq!(summary.categories["transport"].count, 1);
        assert_eq!(summary.categories["transport"].subtotal, 3.0);
        assert_eq!(summary.largest.id, 1);
        assert_eq!(summary.currency_symbol, "€");
        assert_eq!(summary.expense_count(), 3);
    }

    #[test]
    fn test_categories_sorted_by_name() {
        let expenses = vec![
            expense(1, "zoo", 1.0),
            expense(2, "apples", 1.0),
            expense(3, "metro", 1.0),
        ];
        let summary = aggregate(&expenses, "$").unwrap();
        let names: Vec<&str> = summary.categories.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["apples", "metro", "zoo"]);
    }

    #[test]
    fn test_empty_period() {
        assert!(matches!(aggregate(&[], "€"), Err(Error::EmptyPeriod)));
    }

    #[test]
    fn test_largest_tie_goes_to_first_encountered() {
        let expenses = vec![
            expense(1, "a", 2.0),
            expense(2, "b", 9.0),
            expense(3, "c", 9.0),
        ];
        assert_eq!(aggregate(&expenses, "€").unwrap().largest.id, 2);
    }

    #[test]
    fn test_order_does_not_change_totals() {
        let mut expenses = vec![
            expense(1, "food", 10.0),
            expense(2, "food", 5.0),
            expense(3, "transport", 3.0),
        ];
        let forward = aggregate(&expenses, "€").unwrap();
        expenses.reverse();
        let backward = aggregate(&expenses, "€").unwrap();

        assert_eq!(forward.total, backward.total);
        assert_eq!(
            forward.categories["food"].subtotal,
            backward.categories["food"].subtotal
        );
        assert_eq!(forward.largest.id, backward.largest.id);
    }

    #[test]
    fn test_share() {
        let expenses = vec![expense(1, "food", 75.0), expense(2, "fun", 25.0)];
        let summary = aggregate(&expenses, "€").unwrap();
        assert_eq!(summary.share("food"), 75.0);
        assert_eq!(summary.share("missing"), 0.0);
    }
}
