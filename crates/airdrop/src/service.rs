//! Airdrop service core logic

use crate::clock::{SystemTimeSource, TimeSource};
use crate::config::AirdropConfig;
use crate::cooldown::{CooldownStore, WalletGates};
use crate::error::{AirdropError, AirdropResult};
use crate::history::{self, EligibilitySnapshot};
use crate::invoker::{format_amount, MintInvoker, MintOutcome};
use crate::metrics::AirdropMetrics;
use crate::signature::extract_signature;
use crate::wallet::WalletAddress;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Airdrop request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropRequest {
    pub wallet_address: String,
    /// Defaults to, and is capped at, the configured airdrop amount
    #[serde(default)]
    pub amount: Option<f64>,
}

impl AirdropRequest {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Confirmed airdrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirdropResponse {
    pub success: bool,
    pub signature: String,
    pub amount: f64,
    pub wallet_address: String,
    pub message: String,
}

/// Airdrop service
pub struct AirdropService {
    config: AirdropConfig,
    store: Arc<CooldownStore>,
    gates: WalletGates,
    invoker: Arc<dyn MintInvoker>,
    clock: Arc<dyn TimeSource>,
    metrics: Arc<AirdropMetrics>,
}

impl AirdropService {
    /// Create new airdrop service
    pub fn new(config: AirdropConfig, invoker: Arc<dyn MintInvoker>) -> AirdropResult<Self> {
        config.validate()?;
        let metrics = AirdropMetrics::new().map_err(|e| AirdropError::Internal(e.to_string()))?;
        let store = Arc::new(CooldownStore::new(config.cooldown_duration()));

        Ok(Self {
            config,
            store,
            gates: WalletGates::new(),
            invoker,
            clock: Arc::new(SystemTimeSource),
            metrics: Arc::new(metrics),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AirdropConfig {
        &self.config
    }

    pub fn store(&self) -> &CooldownStore {
        &self.store
    }

    pub fn metrics(&self) -> &AirdropMetrics {
        &self.metrics
    }

    /// Airdrop tokens to a wallet
    #[instrument(skip_all, fields(wallet = %request.wallet_address))]
    pub async fn dispatch(&self, request: AirdropRequest) -> AirdropResult<AirdropResponse> {
        self.metrics.requests_total.inc();

        let result = self.run_dispatch(request).await;
        match &result {
            Ok(_) => self.metrics.dispatches_total.inc(),
            Err(e) => self.metrics.record_failure(e.code()),
        }
        result
    }

    async fn run_dispatch(&self, request: AirdropRequest) -> AirdropResult<AirdropResponse> {
        // 1. Validate wallet, clamp amount
        let wallet = WalletAddress::parse(&request.wallet_address, self.config.min_wallet_length)?;
        let amount = self.clamp_amount(request.amount);

        // 2. One dispatch per wallet at a time, held until the record is written
        let _permit = self.gates.acquire(&wallet).await;
        self.check_cooldown(&wallet)?;

        // 3. Mint
        info!("Processing airdrop: {} {} -> {}", amount, self.config.token_symbol, wallet);
        let started = Instant::now();
        let outcome = self.invoker.invoke(&wallet, amount).await;
        self.metrics.mint_duration.observe(started.elapsed().as_secs_f64());

        let stdout = match outcome? {
            MintOutcome::Success { stdout } => stdout,
            MintOutcome::ProcessFailure { exit_code, stderr } => {
                warn!(?exit_code, "Mint failed for {}", wallet);
                return Err(AirdropError::SubprocessFailure(stderr));
            }
            MintOutcome::Timeout => return Err(AirdropError::SubprocessTimeout),
        };

        // 4. A mint without a recoverable signature is not confirmed
        let signature = extract_signature(&stdout).ok_or_else(|| {
            warn!("No transaction signature in mint output for {}", wallet);
            AirdropError::SignatureNotFound
        })?;

        // 5. Record
        self.store.record_dispatch(&wallet, self.clock.now());
        info!(signature = %signature, "Airdrop successful");

        Ok(AirdropResponse {
            success: true,
            signature,
            amount,
            wallet_address: wallet.to_string(),
            message: format!(
                "Successfully airdropped {} {} to your wallet!",
                format_amount(amount),
                self.config.token_symbol
            ),
        })
    }

    fn clamp_amount(&self, requested: Option<f64>) -> f64 {
        let max = self.config.airdrop_amount;
        let amount = requested.unwrap_or(max).min(max);
        if amount < requested.unwrap_or(amount) {
            debug!("Clamped requested amount {:?} to {}", requested, amount);
        }
        amount
    }

    fn check_cooldown(&self, wallet: &WalletAddress) -> AirdropResult<()> {
        let eligibility = self.store.is_eligible(wallet, self.clock.now());
        if !eligibility.eligible {
            let remaining_hours = eligibility.remaining_hours();
            debug!("Wallet {} still cooling down: {:.2}h", wallet, remaining_hours);
            return Err(AirdropError::CooldownActive { remaining_hours });
        }
        Ok(())
    }

    /// Eligibility snapshot for a wallet. Never fails.
    pub fn history(&self, wallet_address: &str) -> EligibilitySnapshot {
        history::query(
            &self.store,
            &WalletAddress::unchecked(wallet_address),
            self.clock.now(),
        )
    }
}
