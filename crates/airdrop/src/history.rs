//! Read-only eligibility view over the cooldown store

use crate::cooldown::CooldownStore;
use crate::wallet::WalletAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-facing eligibility summary, computed at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySnapshot {
    pub wallet_address: String,
    pub last_airdrop: Option<DateTime<Utc>>,
    pub can_request: bool,
    /// Rounded to two decimals, never negative
    pub cooldown_remaining_hours: f64,
}

/// A wallet without a record has never received an airdrop and may request now.
pub fn query(store: &CooldownStore, wallet: &WalletAddress, now: DateTime<Utc>) -> EligibilitySnapshot {
    let eligibility = store.is_eligible(wallet, now);

    EligibilitySnapshot {
        wallet_address: wallet.to_string(),
        last_airdrop: store.last_dispatch(wallet),
        can_request: eligibility.eligible,
        cooldown_remaining_hours: (eligibility.remaining_hours() * 100.0).round() / 100.0,
    }
}
