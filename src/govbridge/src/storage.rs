//! Starknet storage-variable address derivation.
//!
//! `addr = fold(pedersen, starknet_keccak(name), keys) mod (2^251 - 256)`.

use alloy_primitives::U256;
use starknet_types_core::felt::Felt;

use crate::{
    errors::EncodingError,
    utils::{
        crypto::{pedersen, starknet_keccak},
        encoding::{felt_from_hex, felt_to_u256, u256_to_felt},
    },
};

/// Upper bound (exclusive) of the storage address space, `2^251 - 256`.
pub const ADDR_BOUND: U256 = U256::from_limbs([
    0xffff_ffff_ffff_ff00,
    u64::MAX,
    u64::MAX,
    0x07ff_ffff_ffff_ffff,
]);

/// Address of `name`, keyed by zero or more hex-encoded felts.
pub fn get_storage_var_address<S: AsRef<str>>(
    name: &str,
    keys: &[S],
) -> Result<Felt, EncodingError> {
    let keys = keys
        .iter()
        .map(|k| felt_from_hex(k.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(storage_var_address(name, &keys))
}

/// Same as [`get_storage_var_address`] with already-parsed keys.
pub fn storage_var_address(name: &str, keys: &[Felt]) -> Felt {
    let base = starknet_keccak(name.as_bytes());
    let hashed = keys.iter().fold(base, |acc, key| pedersen(&acc, key));
    let reduced = felt_to_u256(&hashed) % ADDR_BOUND;
    Felt::from_bytes_be(&reduced.to_be_bytes::<32>())
}

/// `base + offset` for fields stored contiguously after `base`.
///
/// No reduction is applied: the caller keeps offsets inside one struct's region. The result
/// must still be a valid felt.
pub fn offset_storage_var(base: &Felt, offset: u64) -> Result<Felt, EncodingError> {
    let sum = felt_to_u256(base)
        .checked_add(U256::from(offset))
        .ok_or_else(|| EncodingError::Range("storage offset overflows 256 bits".to_string()))?;
    u256_to_felt(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_KEYS: [&str; 0] = [];

    #[test]
    fn test_addr_bound_value() {
        assert_eq!(ADDR_BOUND, (U256::from(1u64) << 251) - U256::from(256u64));
    }

    #[test]
    fn test_unkeyed_address_is_masked_keccak() {
        let addr = get_storage_var_address("_proposals", &NO_KEYS).unwrap();
        assert_eq!(addr, get_storage_var_address("_proposals", &NO_KEYS).unwrap());
        let keccak = felt_to_u256(&starknet_keccak(b"_proposals"));
        assert_eq!(felt_to_u256(&addr), keccak % ADDR_BOUND);
    }

    #[test]
    fn test_keys_change_address() {
        let a = get_storage_var_address("_commits", &["0x1"]).unwrap();
        let b = get_storage_var_address("_commits", &["0x2"]).unwrap();
        let c = get_storage_var_address("_commits", &["1"]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, c);
        for addr in [a, b] {
            assert!(felt_to_u256(&addr) < ADDR_BOUND);
        }
    }

    #[test]
    fn test_multi_key_is_recursive() {
        let two = get_storage_var_address("_votes", &["0x1", "0x2"]).unwrap();
        let base = starknet_keccak(b"_votes");
        let manual = pedersen(&pedersen(&base, &Felt::from(1u64)), &Felt::from(2u64));
        assert_eq!(felt_to_u256(&two), felt_to_u256(&manual) % ADDR_BOUND);
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(get_storage_var_address("_votes", &["0xnope"]).is_err());
    }

    #[test]
    fn test_offset_is_plain_addition() {
        let base = get_storage_var_address("_proposals", &["0x7"]).unwrap();
        let third = offset_storage_var(&base, 2).unwrap();
        assert_eq!(felt_to_u256(&third), felt_to_u256(&base) + U256::from(2u64));

        // Not wrapped back under ADDR_BOUND.
        let top = u256_to_felt(ADDR_BOUND - U256::from(1u64)).unwrap();
        let past = offset_storage_var(&top, 10).unwrap();
        assert_eq!(felt_to_u256(&past), ADDR_BOUND + U256::from(9u64));
    }
}
