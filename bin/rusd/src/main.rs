mod cli;
mod config_loader;
mod credentials;

use anyhow::Context;
use clap::Parser;
use rusd_airdrop::{api, AirdropService, ProcessMintInvoker};
use rusd_common::utils::logging::init_logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse CLI and load config
    let args = cli::Cli::parse();
    let mut config = config_loader::load_airdrop_config(&args)?;

    if let Some(cli::Commands::ShowConfig) = args.command {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // 2. Setup Logging
    let _log_guard = init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(path) = config_loader::missing_config_file(&args) {
        warn!("Config file {:?} not found, using defaults", path);
    }

    info!("Starting rUSD Airdrop Server v{}", env!("CARGO_PKG_VERSION"));

    // 3. Resolve the signing keypair
    let encoded = std::env::var(credentials::WALLET_BASE64_ENV).ok();
    let credential_dir = args
        .credential_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("rusd-airdrop"));
    config.credential_path = credentials::resolve_credential(
        config.credential_path.as_deref(),
        encoded.as_deref(),
        &credential_dir,
        home::home_dir().as_deref(),
    )?;

    info!("Configuration:");
    info!("  Server address: {}", config.server_addr);
    info!("  Airdrop amount: {} {}", config.airdrop_amount, config.token_symbol);
    info!("  Cooldown period: {} hours", config.cooldown_hours);
    info!("  Provider URL: {}", config.provider_url);
    info!("  Engine dir: {:?}", config.engine_dir);
    info!("  Mint command: {:?} (timeout {}s)", config.mint_command, config.mint_timeout_secs);
    match &config.credential_path {
        Some(path) => info!("  Wallet: {:?}", path),
        None => info!("  Wallet: not configured, airdrops will fail"),
    }

    // 4. Build service
    let invoker = Arc::new(ProcessMintInvoker::from_config(&config));
    let service = Arc::new(AirdropService::new(config.clone(), invoker)?);
    let app = api::router(service);

    // 5. Serve
    let addr: SocketAddr = config
        .server_addr
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr))?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
