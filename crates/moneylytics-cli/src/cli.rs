//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Moneylytics - Keep track of what you spend by chatting
#[derive(Parser)]
#[command(name = "moneylytics")]
#[command(about = "Chat-driven personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "moneylytics.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set MONEYLYTICS_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Chat with the assistant on stdin/stdout
    Chat {
        /// Numeric user id
        #[arg(short, long)]
        user: i64,

        /// Display name used in replies
        #[arg(short, long)]
        name: String,

        /// Optional handle
        #[arg(long)]
        username: Option<String>,
    },

    /// Send a single utterance and print the reply
    Say {
        /// Numeric user id
        #[arg(short, long)]
        user: i64,

        /// Display name used in replies
        #[arg(short, long)]
        name: String,

        /// Message text, e.g. `12,50 food pizza`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Print a report: today, week, month
    Report {
        /// Numeric user id
        #[arg(short, long)]
        user: i64,

        /// Report period
        #[arg(default_value = "today")]
        period: String,

        /// Output JSON (text plus summary)
        #[arg(long)]
        json: bool,
    },

    /// Show a user's profile
    Profile {
        /// Numeric user id
        #[arg(short, long)]
        user: i64,
    },

    /// List a user's most recent expenses
    Expenses {
        /// Numeric user id
        #[arg(short, long)]
        user: i64,

        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Origin allowed by CORS (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },
}
