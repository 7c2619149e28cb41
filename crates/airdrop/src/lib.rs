//! rUSD airdrop service
//!
//! Hands out tokens to wallets that ask for them, at most once per cooldown
//! window per wallet:
//! - Per-wallet cooldown tracking, serialized per wallet
//! - Minting delegated to an external script with a bounded run time
//! - Signature recovery from the script's output
//! - HTTP API and prometheus metrics

pub mod api;
pub mod clock;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod history;
pub mod invoker;
pub mod metrics;
pub mod service;
pub mod signature;
pub mod wallet;

pub use config::AirdropConfig;
pub use cooldown::{CooldownStore, Eligibility, WalletGates};
pub use error::{AirdropError, AirdropResult};
pub use history::EligibilitySnapshot;
pub use invoker::{MintInvoker, MintOutcome, ProcessMintInvoker};
pub use service::{AirdropRequest, AirdropResponse, AirdropService};
pub use signature::extract_signature;
pub use wallet::WalletAddress;
