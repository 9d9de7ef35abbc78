//! Uniform wrapper around a signed or submitted governance action.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use starknet_types_core::felt::Felt;

/// Relay JSON-RPC method an action is submitted under.
pub trait GovernanceAction {
    const METHOD: &'static str;
}

/// Ledger-specific signature encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeSignature {
    /// `r || s || v` hex string.
    Evm(Bytes),
    /// Account signature felts.
    Starknet(Vec<Felt>),
}

/// Everything a verifier needs to check the signature: signer, signature and the exact
/// `(domain, types, message)` that was signed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureData {
    pub address: String,
    pub signature: EnvelopeSignature,
    pub domain: Value,
    pub types: Value,
    pub primary_type: String,
    pub message: Value,
}

/// A governance action plus, for relayed actions, the signature binding it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<D> {
    pub signature_data: Option<SignatureData>,
    pub data: D,
}

impl<D> Envelope<D> {
    pub fn signed(signature_data: SignatureData, data: D) -> Self {
        Self {
            signature_data: Some(signature_data),
            data,
        }
    }

    pub fn unsigned(data: D) -> Self {
        Self {
            signature_data: None,
            data,
        }
    }
}

/// Result of a direct on-chain submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedTransaction {
    /// 0x-hex transaction hash.
    pub transaction_hash: String,
}
