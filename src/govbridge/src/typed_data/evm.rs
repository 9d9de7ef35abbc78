//! EIP-712 typed data as shipped inside EVM envelopes.
//!
//! The digest is always derived from the JSON triple `(domain, types, message)` so that what a
//! wallet displays, what gets signed and what a verifier recomputes are the same bytes.

use alloy_dyn_abi::TypedData;
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::TypedDataError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTypedData {
    pub domain: Value,
    /// Struct definitions, excluding `EIP712Domain`.
    pub types: Value,
    pub primary_type: String,
    pub message: Value,
}

impl EvmTypedData {
    /// `keccak256(0x1901 || domainSeparator || hashStruct(message))`.
    pub fn signing_hash(&self) -> Result<B256, TypedDataError> {
        let typed: TypedData = serde_json::from_value(json!({
            "types": self.types,
            "primaryType": self.primary_type,
            "domain": self.domain,
            "message": self.message,
        }))
        .map_err(|e| TypedDataError::Eip712(e.to_string()))?;
        typed.eip712_signing_hash().map_err(|e| TypedDataError::Eip712(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether_mail() -> EvmTypedData {
        EvmTypedData {
            domain: json!({
                "name": "Ether Mail",
                "version": "1",
                "chainId": 1,
                "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
            }),
            types: json!({
                "Person": [
                    { "name": "name", "type": "string" },
                    { "name": "wallet", "type": "address" }
                ],
                "Mail": [
                    { "name": "from", "type": "Person" },
                    { "name": "to", "type": "Person" },
                    { "name": "contents", "type": "string" }
                ]
            }),
            primary_type: "Mail".to_string(),
            message: json!({
                "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
                "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
                "contents": "Hello, Bob!"
            }),
        }
    }

    #[test]
    fn test_ether_mail_digest() {
        assert_eq!(
            ether_mail().signing_hash().unwrap().to_string(),
            "0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
        );
    }

    #[test]
    fn test_message_change_changes_digest() {
        let mut altered = ether_mail();
        altered.message["contents"] = json!("Hello, Eve!");
        assert_ne!(altered.signing_hash().unwrap(), ether_mail().signing_hash().unwrap());
    }

    #[test]
    fn test_malformed_message_rejected() {
        let mut broken = ether_mail();
        broken.message["to"]["wallet"] = json!("not an address");
        assert!(broken.signing_hash().is_err());
    }
}
