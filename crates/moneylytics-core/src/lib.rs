//! Moneylytics Core Library
//!
//! Shared functionality for the Moneylytics chat expense tracker:
//! - Database access and migrations (users and the expense ledger)
//! - Currency registry with alias resolution
//! - Expense intake parsing
//! - Period aggregation and report formatting
//! - Conversation state machine driving every transport

pub mod aggregate;
pub mod config;
pub mod conversation;
pub mod currency;
pub mod db;
pub mod error;
pub mod intake;
pub mod models;
pub mod report;

pub use aggregate::{aggregate, CategorySummary, PeriodSummary};
pub use config::AppConfig;
pub use conversation::{
    Assistant, Choice, ChoiceSet, Command, OutboundMessage, PeriodReport, Utterance,
};
pub use currency::Currency;
pub use db::Database;
pub use error::{Error, Result};
pub use intake::{Advisory, ParsedExpense};
pub use models::{
    BudgetPeriod, ConversationState, Expense, NewExpense, ReportPeriod, User, UserUpdate,
};
