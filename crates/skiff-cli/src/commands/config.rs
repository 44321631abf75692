//! Config command implementation.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use skiff_client::Config;
use skiff_client::config::user_config_path;

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one configuration value
    Get {
        /// Key to read (base_url, token, api_key, timeout_ms)
        key: String,
    },

    /// Set one configuration value in the user config file
    Set {
        /// Key to write (base_url, token, api_key, timeout_ms)
        key: String,
        /// Value to write
        value: String,
    },

    /// Print the effective configuration
    Show,
}

/// Executes a config subcommand.
pub async fn execute(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Get { key } => get(&key),
        ConfigCommands::Set { key, value } => set(&key, &value),
        ConfigCommands::Show => show(),
    }
}

fn get(key: &str) -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    match key {
        "base_url" => println!("{}", config.base_url),
        "token" => println!("{}", config.token.as_deref().unwrap_or("")),
        "api_key" => println!("{}", config.api_key.as_deref().unwrap_or("")),
        "timeout_ms" => println!("{}", config.timeout_ms),
        other => bail!("unknown configuration key '{other}'"),
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = user_config_path();
    // Edit the file layer only; environment overrides stay untouched.
    let mut config = if path.exists() {
        Config::load_from(&path).context("failed to load configuration file")?
    } else {
        Config::default()
    };

    match key {
        "base_url" => config.base_url = value.to_string(),
        "token" => config.token = Some(value.to_string()),
        "api_key" => config.api_key = Some(value.to_string()),
        "timeout_ms" => {
            config.timeout_ms = value
                .parse()
                .with_context(|| format!("timeout_ms must be an integer, got '{value}'"))?;
        }
        other => bail!("unknown configuration key '{other}'"),
    }

    config
        .save_to(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{key} = {value}");
    Ok(())
}

fn show() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    print!("{}", toml_render(&config));
    Ok(())
}

fn toml_render(config: &Config) -> String {
    let mut out = format!("base_url = \"{}\"\n", config.base_url);
    if let Some(token) = &config.token {
        out.push_str(&format!("token = \"{token}\"\n"));
    }
    if let Some(api_key) = &config.api_key {
        out.push_str(&format!("api_key = \"{api_key}\"\n"));
    }
    out.push_str(&format!("timeout_ms = {}\n", config.timeout_ms));
    out
}
