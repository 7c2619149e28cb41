//! Shared plumbing for the rUSD airdrop workspace: logging setup and
//! file-based configuration loading.

pub mod utils;
