//! Moneylytics CLI - chat expense tracker
//!
//! Usage:
//!   moneylytics init                          Initialize database
//!   moneylytics chat --user 1 --name Ann      Talk to the assistant on stdin
//!   moneylytics report --user 1 week          Print a report
//!   moneylytics serve --port 3000             Start the HTTP transport

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so chat replies on stdout stay clean
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Chat {
            user,
            name,
            username,
        } => {
            let assistant = commands::open_assistant(&cli.db, cli.no_encrypt, config_path)?;
            commands::cmd_chat(&assistant, user, &name, username.as_deref())
        }
        Commands::Say { user, name, text } => {
            let assistant = commands::open_assistant(&cli.db, cli.no_encrypt, config_path)?;
            commands::cmd_say(&assistant, user, &name, &text.join(" "))
        }
        Commands::Report { user, period, json } => {
            let assistant = commands::open_assistant(&cli.db, cli.no_encrypt, config_path)?;
            commands::cmd_report(&assistant, user, &period, json)
        }
        Commands::Profile { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_profile(&db, user)
        }
        Commands::Expenses { user, limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_expenses(&db, user, limit)
        }
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                config_path,
                allowed_origins,
            )
            .await
        }
    }
}
