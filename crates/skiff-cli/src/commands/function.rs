//! Function command implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value, json};
use skiff_client::FunctionRef;

use super::{connect, relative_time, short_id};

/// Function subcommands.
#[derive(Subcommand)]
pub enum FunctionCommands {
    /// List functions
    List,

    /// Create a function
    Create(CreateArgs),

    /// Show a function's details
    Get(TargetArgs),

    /// Deploy a function's current source
    Deploy(DeployArgs),

    /// Invoke a function
    Invoke(InvokeArgs),

    /// Pause a function's warm pool
    Pause(TargetArgs),

    /// Resume a paused function
    Resume(TargetArgs),

    /// Roll a function back to a previous version
    Rollback(RollbackArgs),

    /// Show a function's warm pool state
    Pool(TargetArgs),

    /// List recent invocations of a function
    Invocations(InvocationsArgs),

    /// List deployed versions of a function
    Versions(TargetArgs),
}

/// Executes a function subcommand.
pub async fn execute(cmd: FunctionCommands) -> Result<()> {
    match cmd {
        FunctionCommands::List => list().await,
        FunctionCommands::Create(args) => create(args).await,
        FunctionCommands::Get(args) => get(args).await,
        FunctionCommands::Deploy(args) => deploy(args).await,
        FunctionCommands::Invoke(args) => invoke(args).await,
        FunctionCommands::Pause(args) => pause(args).await,
        FunctionCommands::Resume(args) => resume(args).await,
        FunctionCommands::Rollback(args) => rollback(args).await,
        FunctionCommands::Pool(args) => pool(args).await,
        FunctionCommands::Invocations(args) => invocations(args).await,
        FunctionCommands::Versions(args) => versions(args).await,
    }
}

/// Arguments naming one function.
#[derive(Args)]
pub struct TargetArgs {
    /// Function name or ID
    pub function: String,
}

impl TargetArgs {
    fn reference(&self) -> FunctionRef {
        FunctionRef::from_arg(&self.function)
    }
}

async fn list() -> Result<()> {
    let client = connect().await?;
    let listing = client.list_functions().await?;
    let functions = listing.as_array().cloned().unwrap_or_default();

    println!(
        "{:<14} {:<24} {:<14} {:<10} {:<20}",
        "FUNCTION ID", "NAME", "RUNTIME", "STATE", "UPDATED"
    );
    for function in &functions {
        let id = function.get("id").and_then(Value::as_str).unwrap_or("-");
        let name = function.get("name").and_then(Value::as_str).unwrap_or("-");
        let runtime = function.get("runtime").and_then(Value::as_str).unwrap_or("-");
        let state = function.get("state").and_then(Value::as_str).unwrap_or("-");
        let updated = function
            .get("updated")
            .and_then(Value::as_i64)
            .map(relative_time)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<14} {:<24} {:<14} {:<10} {:<20}",
            short_id(id),
            name,
            runtime,
            state,
            updated
        );
    }
    Ok(())
}

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Function name
    pub name: String,

    /// Path to the function source
    #[arg(short, long)]
    pub source: Option<String>,

    /// Runtime (e.g. python3.11)
    #[arg(short, long)]
    pub runtime: Option<String>,

    /// Handler entry point (e.g. main.handler)
    #[arg(long)]
    pub handler: Option<String>,

    /// Memory limit in MB
    #[arg(short, long)]
    pub memory: Option<u64>,

    /// Warm pool size to request
    #[arg(long)]
    pub pool: Option<u32>,
}

async fn create(args: CreateArgs) -> Result<()> {
    let client = connect().await?;

    let mut payload = Map::new();
    payload.insert("function_name".to_string(), json!(args.name));
    if let Some(source) = &args.source {
        payload.insert("source_path".to_string(), json!(source));
    }
    if let Some(runtime) = &args.runtime {
        payload.insert("runtime".to_string(), json!(runtime));
    }
    if let Some(handler) = &args.handler {
        payload.insert("handler".to_string(), json!(handler));
    }
    if let Some(memory) = args.memory {
        payload.insert("memory_mb".to_string(), json!(memory));
    }
    if let Some(pool) = args.pool {
        payload.insert("warm_pool_size".to_string(), json!(pool));
    }

    let created = client.create_function(Value::Object(payload)).await?;
    match created.get("id").and_then(Value::as_str) {
        Some(id) => println!("{id}"),
        None => println!("{created}"),
    }
    Ok(())
}

async fn get(args: TargetArgs) -> Result<()> {
    let client = connect().await?;
    let function = client.get_function(&args.reference()).await?;
    println!("{}", serde_json::to_string_pretty(&function)?);
    Ok(())
}

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// Function name or ID
    pub function: String,

    /// Deploy without activating the new version
    #[arg(long)]
    pub no_activate: bool,
}

async fn deploy(args: DeployArgs) -> Result<()> {
    let client = connect().await?;

    let payload = if args.no_activate {
        json!({ "activate": false })
    } else {
        json!({})
    };
    let deployed = client
        .deploy_function(&FunctionRef::from_arg(&args.function), payload)
        .await?;

    match deployed.get("version").and_then(Value::as_str) {
        Some(version) => println!("deployed {} at version {version}", args.function),
        None => println!("deployed {}", args.function),
    }
    Ok(())
}

/// Arguments for the invoke command.
#[derive(Args)]
pub struct InvokeArgs {
    /// Function name or ID
    pub function: String,

    /// JSON payload to pass to the function
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Queue the invocation instead of waiting for the result
    #[arg(long)]
    pub r#async: bool,
}

async fn invoke(args: InvokeArgs) -> Result<()> {
    let client = connect().await?;

    let mut body = Map::new();
    if let Some(raw) = &args.payload {
        let parsed: Value =
            serde_json::from_str(raw).context("payload must be valid JSON")?;
        body.insert("payload".to_string(), parsed);
    }
    if args.r#async {
        body.insert("async_mode".to_string(), json!(true));
    }

    let result = client
        .invoke_function(&FunctionRef::from_arg(&args.function), Value::Object(body))
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn pause(args: TargetArgs) -> Result<()> {
    let client = connect().await?;
    client.pause_function(&args.reference()).await?;
    println!("{}", args.function);
    Ok(())
}

async fn resume(args: TargetArgs) -> Result<()> {
    let client = connect().await?;
    client.resume_function(&args.reference()).await?;
    println!("{}", args.function);
    Ok(())
}

/// Arguments for the rollback command.
#[derive(Args)]
pub struct RollbackArgs {
    /// Function name or ID
    pub function: String,

    /// Version to roll back to (defaults to the previous version)
    #[arg(long)]
    pub version: Option<String>,
}

async fn rollback(args: RollbackArgs) -> Result<()> {
    let client = connect().await?;
    let result = client
        .rollback_function(&FunctionRef::from_arg(&args.function), args.version.as_deref())
        .await?;

    match result.get("version").and_then(Value::as_str) {
        Some(version) => println!("rolled back {} to version {version}", args.function),
        None => println!("rolled back {}", args.function),
    }
    Ok(())
}

async fn pool(args: TargetArgs) -> Result<()> {
    let client = connect().await?;
    let state = client.function_pool(&args.reference()).await?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Arguments for the invocations command.
#[derive(Args)]
pub struct InvocationsArgs {
    /// Function name or ID
    pub function: String,

    /// Maximum number of invocations to list
    #[arg(short, long)]
    pub limit: Option<u32>,
}

async fn invocations(args: InvocationsArgs) -> Result<()> {
    let client = connect().await?;
    let listing = client
        .function_invocations(&FunctionRef::from_arg(&args.function), args.limit)
        .await?;
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

async fn versions(args: TargetArgs) -> Result<()> {
    let client = connect().await?;
    let listing = client.function_versions(&args.reference()).await?;
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
