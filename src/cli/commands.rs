use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::api::ApiClient;
use crate::logging::{LogTarget, init_logging};
use crate::settings::{
    DEFAULT_API_PREFIX, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, RawSettings, Settings,
};
use crate::tui::{format_timestamp, run_interactive};
use crate::utils::{default_log_file, single_line};

#[derive(Parser)]
#[command(name = "policy-keeper")]
#[command(version = "0.1.0")]
#[command(about = "Terminal client for managing household insurance policies", long_about = None)]
pub struct Cli {
    /// Backend server URL
    #[arg(long, env = "POLICY_KEEPER_SERVER", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server: String,

    /// Path prefix of the REST API on the server
    #[arg(long, env = "POLICY_KEEPER_API_PREFIX", default_value = DEFAULT_API_PREFIX, global = true)]
    pub api_prefix: String,

    /// Request timeout in seconds
    #[arg(long, env = "POLICY_KEEPER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Page to open on startup (dashboard, members, policies, matching, chat, api-config)
    #[arg(long, default_value = "dashboard")]
    pub page: String,

    /// Log file for the interactive UI
    #[arg(long, env = "POLICY_KEEPER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the backend server is reachable
    Health,
    /// List chat conversations
    Conversations,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(RawSettings {
        server: &cli.server,
        api_prefix: &cli.api_prefix,
        timeout_secs: cli.timeout,
        page: &cli.page,
        log_file: cli.log_file.clone(),
        verbose: cli.verbose,
    })?;

    let runtime = Runtime::new().context("Failed to start async runtime")?;

    match &cli.command {
        Some(command) => {
            init_logging(LogTarget::Stderr, settings.verbose)?;
            let client = settings.api_client()?;
            runtime.block_on(run_command(command, &client))
        }
        None => {
            let log_file = match &settings.log_file {
                Some(path) => path.clone(),
                None => default_log_file()?,
            };
            init_logging(LogTarget::File(log_file), settings.verbose)?;
            run_interactive(&settings, runtime.handle().clone())
        }
    }
}

async fn run_command(command: &Commands, client: &ApiClient) -> Result<()> {
    match command {
        Commands::Health => show_health(client).await,
        Commands::Conversations => list_conversations(client).await,
    }
}

async fn show_health(client: &ApiClient) -> Result<()> {
    let payload = client
        .health()
        .await
        .with_context(|| format!("Server {} is not reachable", client.server_url()))?;

    println!("Server is reachable: {}", client.server_url());
    if !payload.is_null() {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}

async fn list_conversations(client: &ApiClient) -> Result<()> {
    let conversations =
        client.list_conversations().await.context("Failed to load conversations")?;

    if conversations.is_empty() {
        println!("No conversations yet");
        return Ok(());
    }

    println!("Conversations ({})", conversations.len());
    println!("================================");
    for conversation in &conversations {
        println!(
            "{}  {}  ({})",
            conversation.id,
            single_line(&conversation.title),
            format_timestamp(&conversation.updated_at)
        );
    }
    Ok(())
}
