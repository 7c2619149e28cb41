//! External mint tool invocation

use crate::config::AirdropConfig;
use crate::error::{AirdropError, AirdropResult};
use crate::wallet::WalletAddress;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Env var carrying the RPC endpoint for the mint tool
pub const PROVIDER_URL_ENV: &str = "ANCHOR_PROVIDER_URL";

/// Env var carrying the signing keypair path for the mint tool
pub const CREDENTIAL_ENV: &str = "ANCHOR_WALLET";

const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Classified result of one mint tool run
#[derive(Debug, Clone, PartialEq)]
pub enum MintOutcome {
    /// Exit code zero; raw stdout for signature extraction
    Success { stdout: String },
    /// Non-zero exit or killed by a signal (no exit code)
    ProcessFailure { exit_code: Option<i32>, stderr: String },
    /// Did not finish within the configured bound and was killed
    Timeout,
}

/// Boundary to the minting subsystem
#[async_trait]
pub trait MintInvoker: Send + Sync {
    /// Mint `amount` tokens to `wallet`.
    ///
    /// `Err` means nothing was run: the invoker is misconfigured or the
    /// process could not be started.
    async fn invoke(&self, wallet: &WalletAddress, amount: f64) -> AirdropResult<MintOutcome>;
}

/// Runs the mint script as a child process
#[derive(Debug, Clone)]
pub struct ProcessMintInvoker {
    command: Vec<String>,
    working_dir: PathBuf,
    provider_url: String,
    credential_path: Option<PathBuf>,
    timeout: Duration,
}

impl ProcessMintInvoker {
    pub fn new(
        command: Vec<String>,
        working_dir: PathBuf,
        provider_url: String,
        credential_path: Option<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            command,
            working_dir,
            provider_url,
            credential_path,
            timeout,
        }
    }

    pub fn from_config(config: &AirdropConfig) -> Self {
        Self::new(
            config.mint_command.clone(),
            config.engine_dir.clone(),
            config.provider_url.clone(),
            config.credential_path.clone(),
            config.mint_timeout(),
        )
    }

    /// Checked right before every run so a keypair removed after startup is
    /// reported instead of handed to the tool.
    fn resolve_credential(&self) -> AirdropResult<&PathBuf> {
        match &self.credential_path {
            Some(path) if path.exists() => Ok(path),
            Some(path) => Err(AirdropError::ConfigurationMissing(format!(
                "Wallet not found at {}. Please configure SOLANA_WALLET_BASE64 environment variable.",
                path.display()
            ))),
            None => Err(AirdropError::ConfigurationMissing(
                "No signing wallet configured. Please configure SOLANA_WALLET_BASE64 environment variable."
                    .to_string(),
            )),
        }
    }
}

#[async_trait]
impl MintInvoker for ProcessMintInvoker {
    async fn invoke(&self, wallet: &WalletAddress, amount: f64) -> AirdropResult<MintOutcome> {
        let credential = self.resolve_credential()?;

        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| AirdropError::ConfigurationMissing("Mint command is empty".to_string()))?;

        let amount_arg = format_amount(amount);
        info!(
            wallet = %wallet,
            amount = %amount_arg,
            program = %program,
            dir = %self.working_dir.display(),
            "Running mint command"
        );

        let child = Command::new(program)
            .args(args)
            .arg(wallet.as_str())
            .arg(&amount_arg)
            .current_dir(&self.working_dir)
            .env(PROVIDER_URL_ENV, &self.provider_url)
            .env(CREDENTIAL_ENV, credential)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AirdropError::SubprocessFailure(format!("could not start {}: {}", program, e)))?;

        let started = Instant::now();

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Err(_) => {
                warn!(wallet = %wallet, timeout_secs = self.timeout.as_secs(), "Mint command timed out");
                return Ok(MintOutcome::Timeout);
            }
            Ok(result) => result.map_err(|e| AirdropError::SubprocessFailure(e.to_string()))?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Mint output:\n{}", stdout);

        if output.status.success() {
            return Ok(MintOutcome::Success { stdout });
        }

        let stderr = if stderr.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            stderr
        };
        warn!(wallet = %wallet, exit_code = ?output.status.code(), "Mint command failed: {}", stderr.trim_end());

        Ok(MintOutcome::ProcessFailure {
            exit_code: output.status.code(),
            stderr,
        })
    }
}

/// Whole amounts keep one decimal ("50.0"), matching what the mint script
/// has always been called with.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}
