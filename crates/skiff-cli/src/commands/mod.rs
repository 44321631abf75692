//! CLI command implementations.
//!
//! Commands are organized into:
//!
//! - Configuration (config get/set/show)
//! - Container operations (list, create, exec, stop, rm, logs)
//! - Function operations (list, create, get, deploy, invoke, pause, resume,
//!   rollback, pool, invocations, versions)
//! - System operations (health, version)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skiff_client::{Client, Config};

pub mod config;
pub mod container;
pub mod function;
pub mod health;
pub mod version;

/// Skiff - client for the skiff container-runtime daemon
#[derive(Parser)]
#[command(name = "skiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage client configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Manage containers
    #[command(subcommand)]
    Container(container::ContainerCommands),

    /// Manage serverless functions
    #[command(subcommand)]
    Function(function::FunctionCommands),

    /// Check daemon health
    Health,

    /// Show version information
    Version,
}

/// Connects to the daemon, probing reachability first.
pub(crate) async fn connect() -> Result<Client> {
    let config = Config::load().context("failed to load configuration")?;
    let client = Client::connect(&config).await?;
    tracing::debug!(base_url = %client.base_url(), "connected to daemon");
    Ok(client)
}

/// Formats a resource ID for table output (first 12 characters).
pub(crate) fn short_id(id: &str) -> &str {
    if id.len() > 12 { &id[..12] } else { id }
}

/// Formats a relative time string from a Unix timestamp.
pub(crate) fn relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        format!("{diff} seconds ago")
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

/// Renders a JSON value for single-field output.
pub(crate) fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("c-12345678901234"), "c-1234567890");
        assert_eq!(short_id("c-short"), "c-short");
    }

    #[test]
    fn test_display_value_strings_unquoted() {
        assert_eq!(display_value(&serde_json::json!("running")), "running");
        assert_eq!(display_value(&serde_json::json!(42)), "42");
    }
}
