//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the application config
//! - `open_assistant` - Database plus config, ready to handle utterances
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use moneylytics_core::{db::Database, AppConfig, Assistant};
use tracing::warn;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Load config from `--config`, the data dir override, or built-in defaults
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                warn!(path = %path.display(), "Config file not found, using defaults");
            }
            AppConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => AppConfig::load().context("Failed to load config"),
    }
}

pub fn open_assistant(
    db_path: &Path,
    no_encrypt: bool,
    config_path: Option<&Path>,
) -> Result<Assistant> {
    let config = load_config(config_path)?;
    let db = open_db(db_path, no_encrypt)?;
    Ok(Assistant::new(db, config))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let users = db.list_users().context("Failed to read users")?;
    println!("   {} user(s) registered", users.len());

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Talk to the assistant: moneylytics chat --user 1 --name Ann");
    println!("  2. Start the HTTP transport: moneylytics serve");

    Ok(())
}
