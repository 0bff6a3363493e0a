use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

use reltio_mcp_agent::cli::{run_chat, Console};
use reltio_mcp_agent::client::ReltioAgentClient;
use reltio_mcp_agent::core::{load_dotenv_from, ClientConfig, DOTENV_FILE};
use reltio_mcp_agent::logging::{self, LogOptions};

#[derive(Parser)]
#[command(name = "reltio-agent")]
#[command(about = "Agent client for the Reltio AgentFlow MCP Server", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable info-level logging
    #[arg(long, global = true)]
    debug: bool,

    /// Also write JSON logs to this directory
    #[arg(long, global = true, env = "RELTIO_AGENT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Read the base system prompt from this file instead of system_prompt.txt
    #[arg(long, global = true)]
    system_prompt_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the agent
    Chat,
    /// Run a single prompt and print the response
    Task {
        /// The prompt to process
        prompt: String,
    },
    /// Check that the MCP server is reachable and healthy
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = load_dotenv_from(DOTENV_FILE);
    let cli = Cli::parse();

    let _log_guard = match logging::init_logging(&LogOptions {
        debug: cli.debug,
        log_dir: cli.log_dir.clone(),
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match dotenv {
        Ok(true) => tracing::debug!("Loaded environment from {}", DOTENV_FILE),
        Ok(false) => {}
        Err(e) => tracing::warn!("Ignoring {}: {}", DOTENV_FILE, e),
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn build_client(system_prompt_file: Option<PathBuf>) -> Result<ReltioAgentClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(path) = system_prompt_file {
        config = config.with_system_prompt_file(path);
    }
    tracing::debug!("Loaded configuration: {:?}", config);

    Ok(ReltioAgentClient::from_config(config).await?)
}

/// Returns whether the command succeeded
async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Chat => {
            let console = Console::new();
            console.print_system("Initializing Reltio MCP client...");
            let client = build_client(cli.system_prompt_file).await?;
            console.print_system("Client ready!");
            console.println();

            run_chat(&client, &console).await?;
            Ok(true)
        }
        Commands::Task { prompt } => {
            let client = build_client(cli.system_prompt_file).await?;
            let response = client.process_prompt(&prompt).await?;
            println!("{}", response);
            Ok(true)
        }
        Commands::Health => {
            println!("Running Reltio MCP health check...");
            let client = match build_client(cli.system_prompt_file).await {
                Ok(client) => client,
                Err(e) => {
                    println!("{} {:#}", "✗ Health check failed with error:".red().bold(), e);
                    return Ok(false);
                }
            };

            let report = client.health_check().await;
            println!("{}", serde_json::to_string(&report)?);

            if report.is_healthy() {
                println!("{}", "✓ Health check passed - system is healthy!".green().bold());
            } else {
                println!("{}", "✗ Health check failed - system is unhealthy".red().bold());
            }
            Ok(report.is_healthy())
        }
    }
}
