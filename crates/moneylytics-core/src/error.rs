//! Error types for Moneylytics

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Malformed input: must provide at least an amount and a category")]
    MalformedInput,

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("No expenses in this period")]
    EmptyPeriod,
}

impl Error {
    /// Whether this error was caused by the user's input rather than by
    /// storage or configuration problems
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput
                | Self::NotANumber(_)
                | Self::NonPositiveAmount(_)
                | Self::UnknownCurrency(_)
                | Self::UserNotFound(_)
                | Self::EmptyPeriod
        )
    }

    /// Text shown to the chat user for this error
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput => {
                "You must provide at least an amount and a category".to_string()
            }
            Self::NotANumber(token) => format!("'{}' is not a number!", token),
            Self::NonPositiveAmount(_) => "The amount must be greater than zero".to_string(),
            Self::UnknownCurrency(token) => format!(
                "I don't know the currency '{}'. Try EUR, USD, UAH or GBP.",
                token
            ),
            Self::UserNotFound(_) => "Please send /start to register first".to_string(),
            Self::EmptyPeriod => "You don't have any expenses in this period".to_string(),
            _ => "Something went wrong on our side. Please try again later.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_classified() {
        assert!(Error::MalformedInput.is_user_error());
        assert!(Error::EmptyPeriod.is_user_error());
        assert!(!Error::Encryption("bad key".into()).is_user_error());
    }

    #[test]
    fn test_internal_errors_get_generic_message() {
        let msg = Error::InvalidData("column".into()).user_message();
        assert!(msg.contains("Something went wrong"));
        assert!(!msg.contains("column"));
    }

    #[test]
    fn test_not_a_number_message_quotes_token() {
        assert_eq!(
            Error::NotANumber("abc".into()).user_message(),
            "'abc' is not a number!"
        );
    }
}
