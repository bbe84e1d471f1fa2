mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod policy;
mod server;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::serve::ServeArgs;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::gemini::GeminiClient;
use crate::infra::jira::JiraClient;

#[derive(Parser)]
#[command(
    name = "woes",
    author,
    version,
    about = "Conversational intake for datacenter failure tickets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the chat intake API over HTTP.
    Serve(ServeArgs),
    /// Run an intake session in the terminal.
    Chat,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("woes=info")),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Serve(args) => cmd::serve::run(build_context()?, args).await,
        Commands::Chat => cmd::chat::run(&build_context()?).await,
    }
}

fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;

    if config.jira_base_url.is_none() {
        warn!("Jira base URL not configured; ticket creation will fail.");
    }
    if config.jira_email.is_none() {
        warn!("Jira email not configured; ticket creation will fail.");
    }
    if config.jira_token.is_none() {
        warn!("Jira token not configured; ticket creation will fail.");
    }
    if config.gemini_api_key.is_none() {
        warn!("Gemini API key not configured; the intake conversation will fail.");
    }

    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_token.clone(),
    ));
    let language_model = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));

    Ok(AppContext::new(config, issue_tracker, language_model))
}
