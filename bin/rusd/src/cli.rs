use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "rusd-airdrop")]
#[command(author, version, about = "rUSD Airdrop Server", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE", env = "RUSD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server address
    #[arg(long)]
    pub server_addr: Option<String>,

    /// RPC endpoint handed to the mint script
    #[arg(long)]
    pub provider_url: Option<String>,

    /// Signing keypair file
    #[arg(long, value_name = "FILE")]
    pub wallet: Option<PathBuf>,

    /// Directory the mint script runs in
    #[arg(long, value_name = "DIR")]
    pub engine_dir: Option<PathBuf>,

    /// Maximum amount per airdrop
    #[arg(long)]
    pub airdrop_amount: Option<f64>,

    /// Hours between airdrops to the same wallet
    #[arg(long)]
    pub cooldown_hours: Option<f64>,

    /// Mint script timeout (seconds)
    #[arg(long)]
    pub mint_timeout: Option<u64>,

    /// Where a base64-provided keypair is written
    #[arg(long, value_name = "DIR")]
    pub credential_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration and exit
    ShowConfig,
}
