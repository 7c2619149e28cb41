use crate::cli::Cli;
use anyhow::Result;
use rusd_airdrop::AirdropConfig;
use rusd_common::utils::config::load_config_or_default;
use std::path::Path;

/// Defaults, then the config file, then `RUSD_*` env vars, then CLI flags.
pub fn load_airdrop_config(args: &Cli) -> Result<AirdropConfig> {
    let mut config: AirdropConfig = load_config_or_default(args.config.as_ref())?;
    config.apply_env();

    if let Some(addr) = &args.server_addr {
        config.server_addr = addr.clone();
    }

    if let Some(url) = &args.provider_url {
        config.provider_url = url.clone();
    }

    if let Some(wallet) = &args.wallet {
        config.credential_path = Some(wallet.clone());
    }

    if let Some(dir) = &args.engine_dir {
        config.engine_dir = dir.clone();
    }

    if let Some(amount) = args.airdrop_amount {
        config.airdrop_amount = amount;
    }

    if let Some(hours) = args.cooldown_hours {
        config.cooldown_hours = hours;
    }

    if let Some(timeout) = args.mint_timeout {
        config.mint_timeout_secs = timeout;
    }

    if args.debug {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// The `--config` path when it was given but does not exist
pub fn missing_config_file(args: &Cli) -> Option<&Path> {
    args.config.as_deref().filter(|p| !p.exists())
}
