//! Proxy configuration.
//!
//! A proxy is bound to one deployment of the attestation contract: its
//! version string, the chain it lives on and its address. The domain name is
//! always `"EAS"` and is not configurable.

use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Version used when none is configured.
pub const DEFAULT_VERSION: &str = "0.1";

/// Deployment the proxy signs for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    /// Contract version string (default: `"0.1"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// EVM chain ID (e.g., 1 for Ethereum mainnet).
    pub chain_id: u64,
    /// Address of the attestation contract.
    pub verifying_contract: Address,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl ProxyConfig {
    /// Create a configuration from explicit values.
    pub fn new(version: impl Into<String>, chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `EAS_VERSION` (default: `0.1`)
    /// - `EAS_CHAIN_ID` (required, decimal)
    /// - `EAS_VERIFYING_CONTRACT` (required, `0x`-prefixed address)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            version: lookup("EAS_VERSION").unwrap_or_else(default_version),
            chain_id: required(&lookup, "EAS_CHAIN_ID")?,
            verifying_contract: required(&lookup, "EAS_VERIFYING_CONTRACT")?,
        })
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn required<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).ok_or_else(|| ConfigError::MissingEnv(var.to_string()))?;
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnv(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingEnv(String),
    #[error("invalid value for {0}: {1}")]
    InvalidEnv(String, String),
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}
