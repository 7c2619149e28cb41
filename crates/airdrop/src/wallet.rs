//! Recipient wallet identifier

use crate::error::{AirdropError, AirdropResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque recipient identifier. Only a coarse length check is applied here;
/// the minting toolchain performs real address validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(raw: &str, min_len: usize) -> AirdropResult<Self> {
        if raw.is_empty() || raw.chars().count() < min_len {
            return Err(AirdropError::InvalidInput(
                "Invalid wallet address format".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Wrap without validation. Used for read-only lookups.
    pub fn unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_threshold_length() {
        let raw = "1".repeat(32);
        assert_eq!(WalletAddress::parse(&raw, 32).unwrap().as_str(), raw);
    }

    #[test]
    fn test_parse_rejects_short_and_empty() {
        assert!(matches!(
            WalletAddress::parse("", 32),
            Err(AirdropError::InvalidInput(_))
        ));
        assert!(matches!(
            WalletAddress::parse(&"1".repeat(31), 32),
            Err(AirdropError::InvalidInput(_))
        ));
    }
}
