//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config, open_assistant)
//! - `chat` - Conversational commands (chat, say)
//! - `reports` - Report, profile and expense listing commands
//! - `serve` - Web server command

pub mod chat;
pub mod core;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use chat::*;
pub use core::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
