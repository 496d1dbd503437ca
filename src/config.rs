//! Address Configuration
//!
//! Bech32 prefixes used to render SDK account and validator addresses.
//! The configuration is a plain value handed to the functions that need
//! it; nothing here is process-global.

use serde::{Deserialize, Serialize};

use crate::error::{K1Error, K1Result};

/// Longest human-readable part bech32 allows.
const MAX_HRP_LEN: usize = 83;

/// Bech32 prefixes for SDK addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressConfig {
    /// Prefix of account (delegator) addresses
    pub account_prefix: String,
    /// Prefix of validator operator addresses
    pub validator_prefix: String,
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self::story()
    }
}

impl AddressConfig {
    /// Build a configuration from custom prefixes
    pub fn new(account_prefix: impl Into<String>, validator_prefix: impl Into<String>) -> K1Result<Self> {
        let config = Self {
            account_prefix: account_prefix.into(),
            validator_prefix: validator_prefix.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Story network preset
    pub fn story() -> Self {
        Self {
            account_prefix: "story".to_string(),
            validator_prefix: "storyvaloper".to_string(),
        }
    }

    /// Cosmos Hub preset
    pub fn cosmos_hub() -> Self {
        Self {
            account_prefix: "cosmos".to_string(),
            validator_prefix: "cosmosvaloper".to_string(),
        }
    }

    /// Check both prefixes are usable bech32 HRPs
    pub fn validate(&self) -> K1Result<()> {
        validate_hrp(&self.account_prefix)?;
        validate_hrp(&self.validator_prefix)
    }
}

/// HRP rules: 1..=83 ASCII chars in 33..=126, lowercase.
fn validate_hrp(hrp: &str) -> K1Result<()> {
    if hrp.is_empty() || hrp.len() > MAX_HRP_LEN {
        return Err(K1Error::conversion(
            "bech32 prefix",
            format!("length {} outside 1..={}", hrp.len(), MAX_HRP_LEN),
        ));
    }

    if let Some(c) = hrp.chars().find(|c| !(33..=126).contains(&(*c as u32)) || c.is_ascii_uppercase()) {
        return Err(K1Error::conversion(
            "bech32 prefix",
            format!("invalid character {:?} in {:?}", c, hrp),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let story = AddressConfig::default();
        assert_eq!(story.account_prefix, "story");
        assert_eq!(story.validator_prefix, "storyvaloper");
        assert!(story.validate().is_ok());

        let hub = AddressConfig::cosmos_hub();
        assert_eq!(hub.account_prefix, "cosmos");
        assert!(hub.validate().is_ok());
    }

    #[test]
    fn test_custom_prefixes() {
        let config = AddressConfig::new("osmo", "osmovaloper").unwrap();
        assert_eq!(config.account_prefix, "osmo");

        assert!(AddressConfig::new("", "osmovaloper").is_err());
        assert!(AddressConfig::new("Osmo", "osmovaloper").is_err());
        assert!(AddressConfig::new("osmo", "osmo valoper").is_err());
        assert!(AddressConfig::new("a".repeat(84), "osmovaloper").is_err());
    }
}
