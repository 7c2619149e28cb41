//! Airdrop service configuration

use crate::error::{AirdropError, AirdropResult};
use rusd_common::utils::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Ten years
pub const MAX_COOLDOWN_HOURS: f64 = 87_600.0;

/// Airdrop service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirdropConfig {
    /// Server address
    pub server_addr: String,

    /// Maximum (and default) amount minted per request
    pub airdrop_amount: f64,

    /// Cooldown between successful airdrops to the same wallet (hours)
    pub cooldown_hours: f64,

    /// Coarse sanity check on wallet address length
    pub min_wallet_length: usize,

    /// Token symbol used in response messages
    pub token_symbol: String,

    /// RPC endpoint handed to the minting toolchain
    pub provider_url: String,

    /// Signing keypair file handed to the minting toolchain.
    /// Resolved at startup when not set explicitly.
    pub credential_path: Option<PathBuf>,

    /// Working directory of the minting toolchain
    pub engine_dir: PathBuf,

    /// Program and leading arguments of the mint command.
    /// Wallet address and amount are appended.
    pub mint_command: Vec<String>,

    /// Upper bound on a single mint invocation (seconds)
    pub mint_timeout_secs: u64,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Expose prometheus metrics on /metrics
    pub metrics_enabled: bool,

    /// Logging setup
    pub logging: LoggingConfig,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:8002".to_string(),
            airdrop_amount: 50.0,
            cooldown_hours: 24.0,
            min_wallet_length: 32,
            token_symbol: "rUSD".to_string(),
            provider_url: "https://api.devnet.solana.com".to_string(),
            credential_path: None,
            engine_dir: PathBuf::from("../solana-engine"),
            mint_command: vec![
                "ts-node".to_string(),
                "scripts/mint-rusd-to-user.ts".to_string(),
            ],
            mint_timeout_secs: 60,
            cors_enabled: true,
            metrics_enabled: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl AirdropConfig {
    /// Override fields from `RUSD_*` environment variables.
    /// Unparseable numeric values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("RUSD_SERVER_ADDR") {
            self.server_addr = addr;
        }

        if let Ok(amount) = std::env::var("RUSD_AIRDROP_AMOUNT") {
            self.airdrop_amount = amount.parse().unwrap_or(self.airdrop_amount);
        }

        if let Ok(hours) = std::env::var("RUSD_COOLDOWN_HOURS") {
            self.cooldown_hours = hours.parse().unwrap_or(self.cooldown_hours);
        }

        // The minting toolchain's own variable wins over ours
        if let Ok(url) = std::env::var("RUSD_PROVIDER_URL") {
            self.provider_url = url;
        }
        if let Ok(url) = std::env::var("ANCHOR_PROVIDER_URL") {
            self.provider_url = url;
        }

        if let Ok(path) = std::env::var("RUSD_CREDENTIAL_PATH") {
            self.credential_path = Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("RUSD_ENGINE_DIR") {
            self.engine_dir = PathBuf::from(dir);
        }

        if let Ok(timeout) = std::env::var("RUSD_MINT_TIMEOUT") {
            self.mint_timeout_secs = timeout.parse().unwrap_or(self.mint_timeout_secs);
        }

        if let Ok(enabled) = std::env::var("RUSD_CORS_ENABLED") {
            self.cors_enabled = enabled.to_lowercase() == "true";
        }

        if let Ok(enabled) = std::env::var("RUSD_METRICS_ENABLED") {
            self.metrics_enabled = enabled.to_lowercase() == "true";
        }
    }

    /// Reject values the cooldown and mint arithmetic cannot represent
    pub fn validate(&self) -> AirdropResult<()> {
        if !self.cooldown_hours.is_finite()
            || !(0.0..=MAX_COOLDOWN_HOURS).contains(&self.cooldown_hours)
        {
            return Err(AirdropError::InvalidConfig(format!(
                "cooldown_hours must be between 0 and {}, got {}",
                MAX_COOLDOWN_HOURS, self.cooldown_hours
            )));
        }

        if !self.airdrop_amount.is_finite() || self.airdrop_amount <= 0.0 {
            return Err(AirdropError::InvalidConfig(format!(
                "airdrop_amount must be a positive number, got {}",
                self.airdrop_amount
            )));
        }

        if self.mint_timeout_secs == 0 {
            return Err(AirdropError::InvalidConfig(
                "mint_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get cooldown duration
    pub fn cooldown_duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds((self.cooldown_hours * 3_600_000.0).round() as i64)
    }

    /// Get mint timeout
    pub fn mint_timeout(&self) -> Duration {
        Duration::from_secs(self.mint_timeout_secs)
    }
}
