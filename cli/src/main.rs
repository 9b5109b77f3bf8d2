//! votechain — command-line front end for the voting contract.

mod app;
mod commands;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use votechain_client::{ClientConfig, ClientError};
use votechain_types::Address;
use votechain_utils::init_logging;

use crate::commands::Command;

#[derive(Parser)]
#[command(name = "votechain", about = "Campaigns, voting and verification on the votechain contract")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VOTECHAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Node endpoint used for reads.
    #[arg(long, env = "VOTECHAIN_RPC_URL")]
    rpc_url: Option<String>,

    /// Wallet JSON-RPC endpoint that holds the signing account.
    #[arg(long, env = "VOTECHAIN_WALLET_URL")]
    wallet_url: Option<String>,

    /// Address of the deployed voting contract.
    #[arg(long, env = "VOTECHAIN_CONTRACT")]
    contract: Option<Address>,

    /// Expected chain id; the wallet must report the same.
    #[arg(long, env = "VOTECHAIN_CHAIN_ID")]
    chain_id: Option<u64>,

    #[arg(long, env = "VOTECHAIN_IPFS_API_KEY", hide_env_values = true)]
    ipfs_api_key: Option<String>,

    #[arg(long, env = "VOTECHAIN_IPFS_API_SECRET", hide_env_values = true)]
    ipfs_api_secret: Option<String>,

    /// Public gateway used to read pinned documents.
    #[arg(long, env = "VOTECHAIN_IPFS_GATEWAY")]
    ipfs_gateway: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOTECHAIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOTECHAIN_LOG_FORMAT")]
    log_format: Option<String>,

    /// Print the Prometheus metrics exposition after the command.
    #[arg(long, env = "VOTECHAIN_PRINT_METRICS")]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// File settings first, then flags and environment on top.
    fn config(&self) -> Result<ClientConfig, ClientError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_toml_file(path)?,
            None => ClientConfig::default(),
        };
        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if self.wallet_url.is_some() {
            config.wallet_url = self.wallet_url.clone();
        }
        if self.contract.is_some() {
            config.contract_address = self.contract;
        }
        if self.chain_id.is_some() {
            config.chain_id = self.chain_id;
        }
        if let Some(key) = &self.ipfs_api_key {
            config.ipfs.api_key = key.clone();
        }
        if let Some(secret) = &self.ipfs_api_secret {
            config.ipfs.api_secret = secret.clone();
        }
        if let Some(gateway) = &self.ipfs_gateway {
            config.ipfs.gateway_url = gateway.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, format) = match cli.config().and_then(|c| {
        let format = c.log_format()?;
        Ok((c, format))
    }) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(format, &config.log_level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }
    let app = app::App::new(config)?;
    let result = commands::execute(&app, cli.command).await;
    render::flush_notifications(&app);
    if cli.metrics {
        print!("{}", app.client.metrics().encode()?);
    }
    app.shutdown.shutdown();
    result
}

/// Recovery boundary: every failure becomes one classified line and a hint.
fn report(e: &anyhow::Error) {
    match e.downcast_ref::<ClientError>() {
        Some(client) => {
            eprintln!("error: {}", client.user_message());
            if client.is_retryable() {
                eprintln!("hint: this looks transient, try the command again");
            } else {
                eprintln!("hint: fix the input or account state, then retry");
            }
            tracing::debug!(category = ?client.category(), "command failed: {client}");
        }
        None => eprintln!("error: {e:#}"),
    }
}
