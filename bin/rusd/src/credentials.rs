use anyhow::{Context, Result};
use base64::Engine;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Env var carrying a base64-encoded keypair, for deployments without a filesystem secret
pub const WALLET_BASE64_ENV: &str = "SOLANA_WALLET_BASE64";

const MATERIALIZED_FILE: &str = "solana-wallet.json";

/// Work out which keypair file the mint script should sign with.
///
/// An explicit path wins. Otherwise an encoded keypair is decoded into
/// `materialize_dir`, and failing that the Solana CLI default under `home` is
/// used when present. `Ok(None)` means no keypair is available; requests will
/// fail until one is configured.
pub fn resolve_credential(
    explicit: Option<&Path>,
    encoded: Option<&str>,
    materialize_dir: &Path,
    home: Option<&Path>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            warn!("Configured wallet {:?} does not exist", path);
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Some(encoded) = encoded.filter(|s| !s.trim().is_empty()) {
        let path = materialize(encoded, materialize_dir)?;
        info!("Wallet loaded from {} to {:?}", WALLET_BASE64_ENV, path);
        return Ok(Some(path));
    }

    if let Some(default) = home.map(|h| h.join(".config").join("solana").join("id.json")) {
        if default.exists() {
            info!("Using local wallet: {:?}", default);
            return Ok(Some(default));
        }
    }

    warn!(
        "No wallet found! Set {} or create ~/.config/solana/id.json",
        WALLET_BASE64_ENV
    );
    Ok(None)
}

fn materialize(encoded: &str, dir: &Path) -> Result<PathBuf> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .with_context(|| format!("Failed to decode {}", WALLET_BASE64_ENV))?;
    let contents = String::from_utf8(bytes)
        .with_context(|| format!("{} is not a UTF-8 keypair file", WALLET_BASE64_ENV))?;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(MATERIALIZED_FILE);

    // Created exclusively with owner-only permissions, then renamed over
    // whatever sits at `path` (a symlink there is replaced, not followed)
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {:?}", dir))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .with_context(|| format!("Failed to write {:?}", file.path()))?;
    file.persist(&path)
        .with_context(|| format!("Failed to write {:?}", path))?;

    Ok(path)
}
