//! Per-wallet cooldown tracking
//!
//! [`CooldownStore`] keeps the time of the last successful dispatch for each
//! wallet. Records live for the lifetime of the process and are overwritten,
//! never appended or removed.
//!
//! [`WalletGates`] serializes dispatches for the same wallet so that the
//! eligibility check and the later record cannot interleave with another
//! request for that wallet while a mint is in flight.

use crate::wallet::WalletAddress;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

/// Result of an eligibility query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    /// Time until the wallet becomes eligible, zero when it already is
    pub remaining: Duration,
}

impl Eligibility {
    pub fn remaining_hours(&self) -> f64 {
        self.remaining.num_milliseconds() as f64 / 3_600_000.0
    }
}

/// In-memory map of wallet to last dispatch time
pub struct CooldownStore {
    cooldown: Duration,
    records: RwLock<HashMap<WalletAddress, DateTime<Utc>>>,
}

impl CooldownStore {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Eligible iff there is no record or `now >= last + cooldown`.
    /// A cooldown end past the representable range never expires.
    pub fn is_eligible(&self, wallet: &WalletAddress, now: DateTime<Utc>) -> Eligibility {
        let Some(last) = self.last_dispatch(wallet) else {
            return Eligibility {
                eligible: true,
                remaining: Duration::zero(),
            };
        };

        match last.checked_add_signed(self.cooldown) {
            Some(cooldown_end) => Eligibility {
                eligible: now >= cooldown_end,
                remaining: (cooldown_end - now).max(Duration::zero()),
            },
            None => Eligibility {
                eligible: false,
                remaining: self
                    .cooldown
                    .checked_sub(&(now - last))
                    .unwrap_or(self.cooldown),
            },
        }
    }

    /// Overwrites the wallet's timestamp with `now`
    pub fn record_dispatch(&self, wallet: &WalletAddress, now: DateTime<Utc>) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(wallet.clone(), now);
        debug!(wallet = %wallet, at = %now, "Recorded dispatch");
    }

    pub fn last_dispatch(&self, wallet: &WalletAddress) -> Option<DateTime<Utc>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.get(wallet).copied()
    }

    /// Number of wallets that have received at least one dispatch
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type GateMap = HashMap<WalletAddress, Arc<tokio::sync::Mutex<()>>>;

/// Single-flight gate per wallet
#[derive(Default)]
pub struct WalletGates {
    gates: Arc<Mutex<GateMap>>,
}

impl WalletGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other dispatch for `wallet` is in progress.
    /// The gate is released when the returned permit is dropped.
    pub async fn acquire(&self, wallet: &WalletAddress) -> WalletPermit {
        let gate = {
            let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
            gates.entry(wallet.clone()).or_default().clone()
        };

        let guard = gate.lock_owned().await;

        WalletPermit {
            gates: self.gates.clone(),
            wallet: wallet.clone(),
            guard: Some(guard),
        }
    }

    /// Wallets with a dispatch in progress or waiting
    pub fn active(&self) -> usize {
        self.gates.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct WalletPermit {
    gates: Arc<Mutex<GateMap>>,
    wallet: WalletAddress,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for WalletPermit {
    fn drop(&mut self) {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        drop(self.guard.take());

        // Only the map still references the gate: nobody is waiting on it
        let unused = gates
            .get(&self.wallet)
            .map(|gate| Arc::strong_count(gate) == 1)
            .unwrap_or(false);
        if unused {
            gates.remove(&self.wallet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wallet() -> WalletAddress {
        WalletAddress::unchecked("11111111111111111111111111111111")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_unknown_wallet_is_always_eligible() {
        let store = CooldownStore::new(Duration::hours(24));
        for offset in [-1_000_000, 0, 1, 86_400, 10_000_000] {
            let e = store.is_eligible(&wallet(), t0() + Duration::seconds(offset));
            assert!(e.eligible);
            assert_eq!(e.remaining, Duration::zero());
        }
    }

    #[test]
    fn test_cooldown_window_boundaries() {
        let store = CooldownStore::new(Duration::hours(24));
        store.record_dispatch(&wallet(), t0());

        assert!(!store.is_eligible(&wallet(), t0()).eligible);
        assert!(!store.is_eligible(&wallet(), t0() + Duration::hours(12)).eligible);
        assert!(
            !store
                .is_eligible(&wallet(), t0() + Duration::hours(24) - Duration::milliseconds(1))
                .eligible
        );

        let at_boundary = store.is_eligible(&wallet(), t0() + Duration::hours(24));
        assert!(at_boundary.eligible);
        assert_eq!(at_boundary.remaining, Duration::zero());

        assert!(store.is_eligible(&wallet(), t0() + Duration::hours(48)).eligible);
    }

    #[test]
    fn test_remaining_decreases_to_zero() {
        let store = CooldownStore::new(Duration::hours(24));
        store.record_dispatch(&wallet(), t0());

        let mut previous = store.is_eligible(&wallet(), t0()).remaining;
        assert_eq!(previous, Duration::hours(24));

        for minutes in (30..=24 * 60).step_by(30) {
            let remaining = store
                .is_eligible(&wallet(), t0() + Duration::minutes(minutes))
                .remaining;
            assert!(remaining < previous);
            previous = remaining;
        }
        assert_eq!(previous, Duration::zero());
    }

    #[test]
    fn test_record_overwrites() {
        let store = CooldownStore::new(Duration::hours(1));
        store.record_dispatch(&wallet(), t0());
        store.record_dispatch(&wallet(), t0() + Duration::hours(5));

        assert_eq!(store.len(), 1);
        assert_eq!(store.last_dispatch(&wallet()), Some(t0() + Duration::hours(5)));
        assert!(!store.is_eligible(&wallet(), t0() + Duration::hours(5)).eligible);
    }

    #[test]
    fn test_cooldown_past_calendar_end_never_expires() {
        let store = CooldownStore::new(Duration::days(365 * 1_000_000));
        store.record_dispatch(&wallet(), t0());

        let e = store.is_eligible(&wallet(), t0() + Duration::days(365));
        assert!(!e.eligible);
        assert!(e.remaining > Duration::zero());
        assert!(e.remaining_hours() > 1e9);

        // Unrelated wallets are unaffected
        let other = WalletAddress::unchecked("22222222222222222222222222222222");
        assert!(store.is_eligible(&other, t0()).eligible);
    }

    #[test]
    fn test_remaining_hours() {
        let e = Eligibility {
            eligible: false,
            remaining: Duration::minutes(90),
        };
        assert!((e.remaining_hours() - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_gate_serializes_same_wallet() {
        let gates = Arc::new(WalletGates::new());
        let permit = gates.acquire(&wallet()).await;
        assert_eq!(gates.active(), 1);

        let gates2 = gates.clone();
        let waiter = tokio::spawn(async move {
            let _p = gates2.acquire(&wallet()).await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        waiter.await.unwrap();
        assert_eq!(gates.active(), 0);
    }

    #[tokio::test]
    async fn test_gate_does_not_block_other_wallets() {
        let gates = WalletGates::new();
        let _a = gates.acquire(&wallet()).await;
        let other = WalletAddress::unchecked("22222222222222222222222222222222");
        let b = tokio::time::timeout(std::time::Duration::from_secs(1), gates.acquire(&other)).await;
        assert!(b.is_ok());
        assert_eq!(gates.active(), 2);
    }
}
