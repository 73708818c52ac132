//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_assistant;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    config_path: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Moneylytics server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if !allowed_origins.is_empty() {
        println!("   Allowed origins: {}", allowed_origins.join(", "));
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let assistant = open_assistant(db_path, no_encrypt, config_path)?;
    let config = moneylytics_server::ServerConfig { allowed_origins };

    moneylytics_server::serve(assistant, host, port, config).await?;

    Ok(())
}
