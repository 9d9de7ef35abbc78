//! Network configuration for the envelope clients.
//!
//! Clients never read global state: each one is built from one of these structs. All of them
//! deserialize from JSON; omitted domain blocks fall back to the protocol defaults.

use std::{fs, path::Path};

use alloy_primitives::Address;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use starknet_types_core::felt::Felt;

use crate::errors::{Error, Result};

pub const DEFAULT_EVM_DOMAIN_NAME: &str = "snapshot-x";
pub const DEFAULT_EVM_DOMAIN_VERSION: &str = "1";
pub const DEFAULT_STARKNET_DOMAIN_NAME: &str = "sx-starknet";
pub const DEFAULT_STARKNET_DOMAIN_VERSION: &str = "0.1.0";

/// Parse a config from JSON text.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| Error::Input(format!("invalid config: {e}")))
}

/// Read and parse a JSON config file.
pub fn from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Input(format!("failed reading {}: {e}", path.display())))?;
    from_json_str(&text)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmDomainConfig {
    pub name: String,
    pub version: String,
}

impl Default for EvmDomainConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_EVM_DOMAIN_NAME.to_string(),
            version: DEFAULT_EVM_DOMAIN_VERSION.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmAuthenticators {
    /// Verifying contract of signature envelopes.
    pub eth_sig: Address,
    /// Authenticator for direct transactions.
    pub eth_tx: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmNetworkConfig {
    pub chain_id: u64,
    #[serde(default)]
    pub domain: EvmDomainConfig,
    pub authenticators: EvmAuthenticators,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarknetDomainConfig {
    pub name: String,
    pub version: String,
}

impl Default for StarknetDomainConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STARKNET_DOMAIN_NAME.to_string(),
            version: DEFAULT_STARKNET_DOMAIN_VERSION.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetAuthenticators {
    pub stark_sig: Felt,
    pub stark_tx: Felt,
    /// Consumes commits made on L1 by [`StarknetNetworkConfig::l1_commit`].
    pub eth_tx: Felt,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetNetworkConfig {
    /// Chain id felt, e.g. the short string `SN_SEPOLIA` (`0x534e5f5345504f4c4941`).
    pub chain_id: Felt,
    #[serde(default)]
    pub domain: StarknetDomainConfig,
    pub authenticators: StarknetAuthenticators,
    /// L1 contract that forwards commits to `authenticators.eth_tx`.
    pub l1_commit: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub url: String,
}
