use anyhow::{Context, Result};
use ::config::{Config, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Loads configuration from a file into a struct.
/// Supports TOML, YAML, JSON, etc. based on file extension.
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path_str = path.as_ref().to_str().context("Invalid config path")?;

    let settings = Config::builder()
        .add_source(File::with_name(path_str))
        .build()
        .context("Failed to build configuration")?;

    settings.try_deserialize::<T>().context("Failed to deserialize configuration")
}

/// Like [`load_config`], but falls back to `T::default()` when no path is given
/// or the file does not exist. Callers that want to report the missing file
/// should do so once logging is up.
pub fn load_config_or_default<T, P>(path: Option<P>) -> Result<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    match path {
        Some(p) if p.as_ref().exists() => load_config(p),
        _ => Ok(T::default()),
    }
}
