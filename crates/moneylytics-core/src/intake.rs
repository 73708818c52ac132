//! Expense intake parsing
//!
//! Turns an utterance like `"12,50 food pizza with friends"` into a
//! [`NewExpense`] ready to be appended to the ledger. Parsing has no side
//! effects; the caller persists the result.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::NewExpense;

/// Non-fatal warning attached to an accepted expense
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Amount is above the configured threshold
    LargeAmount { amount: f64, threshold: f64 },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Self::LargeAmount { amount, .. } => format!(
                "⚠️ That's a large amount ({:.2}). Saved anyway, double-check it if it was a typo.",
                amount
            ),
        }
    }
}

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpense {
    pub expense: NewExpense,
    pub advisory: Option<Advisory>,
}

/// Parse a decimal amount, accepting `,` as the decimal separator
///
/// Non-finite values ("inf", "NaN") are not amounts.
pub fn parse_amount(token: &str) -> Result<f64> {
    let normalized = token.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::NotANumber(token.to_string())),
    }
}

/// Parse an `amount category [description...]` utterance
pub fn parse_expense(text: &str, large_amount_threshold: f64) -> Result<ParsedExpense> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Error::MalformedInput);
    }

    let amount = parse_amount(tokens[0])?;
    let category = tokens[1].trim().to_lowercase();
    let description = if tokens.len() > 2 {
        Some(tokens[2..].join(" "))
    } else {
        None
    };

    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount(amount));
    }

    let advisory = (amount > large_amount_threshold).then_some(Advisory::LargeAmount {
        amount,
        threshold: large_amount_threshold,
    });

    Ok(ParsedExpense {
        expense: NewExpense {
            amount,
            category,
            description,
        },
        advisory,
    })
}
