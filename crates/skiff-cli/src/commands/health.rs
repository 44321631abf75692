//! Health command implementation.

use anyhow::{Context, Result};
use serde_json::Value;
use skiff_client::{Client, Config};

/// Executes the health command.
pub async fn execute() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let client = Client::new(&config);

    let report = client.health().await?;
    let status = report
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("ok");
    println!("{} is {status}", client.base_url());
    Ok(())
}
