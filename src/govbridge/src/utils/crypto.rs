//! Hash primitives for both ledgers, and EVM signature recovery.
//!
//! EVM side: Keccak-256. Starknet side: `starknet_keccak` (Keccak-256 truncated to 250 bits),
//! Pedersen (`compute_hash_on_elements`) and Poseidon.

use alloy_primitives::{Address, B256};
use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use sha3::{Digest, Keccak256};
use starknet_crypto::{pedersen_hash, poseidon_hash_many};
use starknet_types_core::felt::Felt;

use crate::{errors::EncodingError, utils::encoding::Rsv};

pub fn keccak256(bytes: impl AsRef<[u8]>) -> B256 {
    let mut h = Keccak256::new();
    h.update(bytes.as_ref());
    B256::from_slice(h.finalize().as_slice())
}

/// Keccak-256 masked to its low 250 bits.
pub fn starknet_keccak(bytes: impl AsRef<[u8]>) -> Felt {
    let mut out = keccak256(bytes).0;
    out[0] &= 0x03;
    Felt::from_bytes_be(&out)
}

/// Entry point selector for a Cairo function name.
pub fn selector_from_name(name: &str) -> Felt {
    starknet_keccak(name.as_bytes())
}

pub fn pedersen(a: &Felt, b: &Felt) -> Felt {
    pedersen_hash(a, b)
}

/// `h(h(h(h(0, e0), e1), ...), n)`: Pedersen chain over the elements, closed by the length.
pub fn compute_hash_on_elements(elements: &[Felt]) -> Felt {
    let acc = elements.iter().fold(Felt::ZERO, |acc, e| pedersen_hash(&acc, e));
    pedersen_hash(&acc, &Felt::from(elements.len() as u64))
}

pub fn poseidon_hash(elements: &[Felt]) -> Felt {
    poseidon_hash_many(elements)
}

/// Ethereum address of a secp256k1 public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the signer address from a 32-byte digest and a 65-byte `r || s || v` signature.
///
/// `v` may be given as {0, 1} or {27, 28}.
pub fn recover_address(digest: B256, sig: &[u8]) -> Result<Address, EncodingError> {
    let rsv = Rsv::from_signature(sig)?;
    let v = rsv.y_parity()?;
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| EncodingError::InvalidSignature(format!("bad recovery id {v}")))?;
    let signature = Signature::from_slice(&rsv.rs_bytes())
        .map_err(|e| EncodingError::InvalidSignature(e.to_string()))?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|e| EncodingError::InvalidSignature(e.to_string()))?;
    Ok(address_of(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::encoding::felt_from_hex;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_selector_transfer() {
        assert_eq!(
            selector_from_name("transfer"),
            felt_from_hex("0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e")
                .unwrap()
        );
    }

    #[test]
    fn test_pedersen_reference_vector() {
        let felt = |hex: &str| felt_from_hex(hex).unwrap();
        let a = felt("0x03d937c035c878245caf64531a5756109c53068da139362728feb561405371cb");
        let b = felt("0x0208a0a10250e382e1e4bbe2880906c2791bf6275695e02fbbc6aeff9cd8b31a");
        assert_eq!(
            pedersen(&a, &b),
            felt("0x030e480bed5fe53fa909cc0f8c4d99b8f9f2c016be4c41e13a4848797979c662")
        );
    }

    #[test]
    fn test_hash_on_elements_includes_length() {
        let empty = compute_hash_on_elements(&[]);
        assert_eq!(empty, pedersen(&Felt::ZERO, &Felt::ZERO));
        let one = compute_hash_on_elements(&[Felt::ONE]);
        assert_eq!(one, pedersen(&pedersen(&Felt::ZERO, &Felt::ONE), &Felt::ONE));
    }

    #[test]
    fn test_recover_rejects_malformed() {
        assert!(recover_address(B256::ZERO, &[0u8; 64]).is_err());
        let mut sig = [1u8; 65];
        sig[64] = 5;
        assert!(recover_address(B256::ZERO, &sig).is_err());
        sig[64] = 29;
        assert!(recover_address(B256::ZERO, &sig).is_err());
    }
}
