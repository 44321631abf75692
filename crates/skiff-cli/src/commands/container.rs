//! Container command implementations.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use serde_json::{Map, Value, json};
use skiff_client::ContainerRef;

use super::{connect, display_value, relative_time, short_id};

/// Container subcommands.
#[derive(Subcommand)]
pub enum ContainerCommands {
    /// List containers
    List(ListArgs),

    /// Create a container
    Create(CreateArgs),

    /// Execute a command in a running container
    Exec(ExecArgs),

    /// Stop a running container
    Stop(StopArgs),

    /// Remove one or more containers
    Rm(RmArgs),

    /// Fetch the logs of a container
    Logs(LogsArgs),
}

/// Executes a container subcommand.
pub async fn execute(cmd: ContainerCommands) -> Result<()> {
    match cmd {
        ContainerCommands::List(args) => list(args).await,
        ContainerCommands::Create(args) => create(args).await,
        ContainerCommands::Exec(args) => exec(args).await,
        ContainerCommands::Stop(args) => stop(args).await,
        ContainerCommands::Rm(args) => rm(args).await,
        ContainerCommands::Logs(args) => logs(args).await,
    }
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Show all containers (including stopped)
    #[arg(short, long)]
    pub all: bool,

    /// Only show container IDs
    #[arg(short, long)]
    pub quiet: bool,
}

async fn list(args: ListArgs) -> Result<()> {
    let client = connect().await?;

    let filters = if args.all { json!({ "all": true }) } else { json!({}) };
    let listing = client.list_containers(filters).await?;
    let containers = listing.as_array().cloned().unwrap_or_default();

    if args.quiet {
        for container in &containers {
            if let Some(id) = container.get("id").and_then(Value::as_str) {
                println!("{id}");
            }
        }
        return Ok(());
    }

    println!(
        "{:<14} {:<20} {:<30} {:<12} {:<20}",
        "CONTAINER ID", "NAME", "IMAGE", "STATUS", "CREATED"
    );
    for container in &containers {
        let id = container.get("id").and_then(Value::as_str).unwrap_or("-");
        let name = container.get("name").and_then(Value::as_str).unwrap_or("-");
        let image = container
            .get("image_path")
            .and_then(Value::as_str)
            .unwrap_or("-");
        let status = container.get("status").and_then(Value::as_str).unwrap_or("-");
        let created = container
            .get("created")
            .and_then(Value::as_i64)
            .map(relative_time)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<14} {:<20} {:<30} {:<12} {:<20}",
            short_id(id),
            name,
            image,
            status,
            created
        );
    }

    Ok(())
}

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Command to execute
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Assign a name to the container
    #[arg(long)]
    pub name: Option<String>,

    /// Filesystem image to create from
    #[arg(short, long)]
    pub image: Option<String>,

    /// Environment variables (KEY=VALUE)
    #[arg(short, long)]
    pub env: Vec<String>,

    /// Working directory
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// Memory limit in MB
    #[arg(short, long)]
    pub memory: Option<u64>,

    /// Wait for the container to finish starting
    #[arg(long)]
    pub sync: bool,
}

async fn create(args: CreateArgs) -> Result<()> {
    let client = connect().await?;

    let mut payload = Map::new();
    if let Some(name) = &args.name {
        payload.insert("name".to_string(), json!(name));
    }
    if let Some(image) = &args.image {
        payload.insert("image_path".to_string(), json!(image));
    }
    if !args.command.is_empty() {
        payload.insert("command".to_string(), json!(args.command));
    }
    if !args.env.is_empty() {
        payload.insert("env".to_string(), Value::Object(parse_env(&args.env)?));
    }
    if let Some(workdir) = &args.workdir {
        payload.insert("working_dir".to_string(), json!(workdir));
    }
    if let Some(memory) = args.memory {
        payload.insert("memory_mb".to_string(), json!(memory));
    }
    if args.sync {
        payload.insert("async_mode".to_string(), json!(false));
    }

    let created = client.create_container(Value::Object(payload)).await?;
    match created.get("id").and_then(Value::as_str) {
        Some(id) => println!("{id}"),
        None => println!("{created}"),
    }
    Ok(())
}

fn parse_env(entries: &[String]) -> Result<Map<String, Value>> {
    let mut env = Map::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("invalid environment variable '{entry}', expected KEY=VALUE");
        };
        env.insert(key.to_string(), json!(value));
    }
    Ok(env)
}

/// Arguments for the exec command.
#[derive(Args)]
pub struct ExecArgs {
    /// Container name or ID
    pub container: String,

    /// Command to execute
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Multi-line script to execute instead of a command
    #[arg(long, conflicts_with = "command")]
    pub script: Option<String>,

    /// Working directory inside the container
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// Environment variables (KEY=VALUE)
    #[arg(short, long)]
    pub env: Vec<String>,
}

async fn exec(args: ExecArgs) -> Result<()> {
    let client = connect().await?;

    let mut payload = Map::new();
    if let Some(script) = &args.script {
        payload.insert("script".to_string(), json!(script));
    } else if !args.command.is_empty() {
        payload.insert("command".to_string(), json!(args.command));
    }
    if let Some(workdir) = &args.workdir {
        payload.insert("working_dir".to_string(), json!(workdir));
    }
    if !args.env.is_empty() {
        payload.insert("env".to_string(), Value::Object(parse_env(&args.env)?));
    }

    let reference = ContainerRef::from_arg(&args.container);
    let result = client.exec(&reference, Value::Object(payload)).await?;

    if let Some(stdout) = result.get("stdout").and_then(Value::as_str) {
        print!("{stdout}");
    }
    if let Some(stderr) = result.get("stderr").and_then(Value::as_str) {
        eprint!("{stderr}");
    }
    if let Some(code) = result.get("exit_code").and_then(Value::as_i64) {
        if code != 0 {
            std::process::exit(i32::try_from(code).unwrap_or(1));
        }
    }
    Ok(())
}

/// Arguments for the stop command.
#[derive(Args)]
pub struct StopArgs {
    /// Container name or ID
    pub container: String,

    /// Timeout in seconds before the container is killed
    #[arg(short, long, default_value = "10")]
    pub time: u64,

    /// Kill immediately instead of waiting
    #[arg(short, long)]
    pub force: bool,
}

async fn stop(args: StopArgs) -> Result<()> {
    let client = connect().await?;

    let reference = ContainerRef::from_arg(&args.container);
    let payload = json!({ "timeout_ms": args.time * 1000, "force": args.force });
    client.stop_container(&reference, payload).await?;

    println!("{}", args.container);
    Ok(())
}

/// Arguments for the rm command.
#[derive(Args)]
pub struct RmArgs {
    /// Container names or IDs
    #[arg(required = true)]
    pub containers: Vec<String>,

    /// Force removal of running containers
    #[arg(short, long)]
    pub force: bool,
}

async fn rm(args: RmArgs) -> Result<()> {
    let client = connect().await?;

    for container in &args.containers {
        let reference = ContainerRef::from_arg(container);
        client
            .remove_container(&reference, args.force)
            .await
            .with_context(|| format!("failed to remove '{container}'"))?;
        println!("{container}");
    }
    Ok(())
}

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    /// Container name or ID
    pub container: String,

    /// Number of lines to show from the end
    #[arg(long)]
    pub tail: Option<u32>,
}

async fn logs(args: LogsArgs) -> Result<()> {
    let client = connect().await?;

    let reference = ContainerRef::from_arg(&args.container);
    let response = client.container_logs(&reference, args.tail).await?;

    match response.get("lines").and_then(Value::as_array) {
        Some(lines) => {
            for line in lines {
                println!("{}", display_value(line));
            }
        }
        None => println!("{}", display_value(&response)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env() {
        let env = parse_env(&["PATH=/bin".to_string(), "EMPTY=".to_string()]).unwrap();
        assert_eq!(env["PATH"], json!("/bin"));
        assert_eq!(env["EMPTY"], json!(""));
    }

    #[test]
    fn test_parse_env_rejects_missing_separator() {
        assert!(parse_env(&["NOEQUALS".to_string()]).is_err());
    }
}
