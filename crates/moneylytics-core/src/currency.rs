//! Currency registry
//!
//! Maps free-form currency tokens (ISO codes, names, symbols) to one of the
//! supported canonical currencies, and canonical codes to display symbols.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported canonical currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Uah,
    Gbp,
}

/// Alias table, keys are already upper-cased and whitespace-collapsed
const ALIASES: &[(&str, Currency)] = &[
    ("EUR", Currency::Eur),
    ("EURO", Currency::Eur),
    ("EUROS", Currency::Eur),
    ("€", Currency::Eur),
    ("USD", Currency::Usd),
    ("DOLLAR", Currency::Usd),
    ("DOLLARS", Currency::Usd),
    ("AMERICAN DOLLAR", Currency::Usd),
    ("US DOLLAR", Currency::Usd),
    ("$", Currency::Usd),
    ("UAH", Currency::Uah),
    ("HRYVNIA", Currency::Uah),
    ("HRYVNIAS", Currency::Uah),
    ("UKRAINIAN HRYVNIA", Currency::Uah),
    ("₴", Currency::Uah),
    ("GBP", Currency::Gbp),
    ("POUND", Currency::Gbp),
    ("POUNDS", Currency::Gbp),
    ("BRITISH POUND", Currency::Gbp),
    ("POUND STERLING", Currency::Gbp),
    ("£", Currency::Gbp),
];

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Uah => "UAH",
            Self::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Usd => "$",
            Self::Uah => "₴",
            Self::Gbp => "£",
        }
    }

    /// All canonical currencies, in the order they are offered to users
    pub fn all() -> &'static [Currency] {
        &[Self::Eur, Self::Usd, Self::Uah, Self::Gbp]
    }
}

/// Resolve a user-supplied token to a canonical currency
///
/// Case-insensitive; surrounding whitespace is ignored and inner runs of
/// whitespace are collapsed, so "american   dollar" resolves to USD.
pub fn normalize(token: &str) -> Result<Currency> {
    let key = token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, currency)| *currency)
        .ok_or_else(|| Error::UnknownCurrency(token.trim().to_string()))
}

/// Display symbol for a stored currency code, or the code itself if no
/// symbol is registered for it
pub fn symbol_for(code: &str) -> String {
    match code.parse::<Currency>() {
        Ok(currency) => currency.symbol().to_string(),
        Err(_) => code.to_string(),
    }
}

impl std::str::FromStr for Currency {
    type Err = Error;

    /// Strict parse of a canonical code (used when reading stored rows)
    fn from_str(s: &str) -> Result<Self> {
        Currency::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownCurrency(s.to_string()))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
