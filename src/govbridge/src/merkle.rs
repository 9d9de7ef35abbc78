//! Voting-power whitelist Merkle tree (Starknet side).
//!
//! The tree is never materialized; roots and proofs are computed level by level from an ordered
//! list of leaf hashes. Odd levels are padded with a zero hash, and every sibling pair is ordered
//! by numeric magnitude (larger first) before hashing, so verifiers never need a direction bit.
//!
//! The top-level leaf order is not sorted here. Callers must fix it (e.g. by address) so that
//! independently computed proofs agree.

use alloy_primitives::U256;
use govbridge_types::AddressKind;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

use crate::{
    errors::MerkleError,
    utils::{
        crypto::compute_hash_on_elements,
        encoding::{u256_to_felt, SplitUint256},
    },
};

/// A whitelist entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    #[serde(rename = "type")]
    pub kind: AddressKind,
    pub address: U256,
    pub voting_power: U256,
}

impl Leaf {
    pub fn new(kind: AddressKind, address: U256, voting_power: U256) -> Self {
        Self {
            kind,
            address,
            voting_power,
        }
    }

    /// `H([kind, address, power.low, power.high])`.
    ///
    /// Fails if the address does not fit in a felt.
    pub fn hash(&self) -> Result<Felt, MerkleError> {
        let power = SplitUint256::from_uint(self.voting_power).to_felts();
        Ok(compute_hash_on_elements(&[
            Felt::from(u8::from(self.kind)),
            u256_to_felt(self.address)?,
            power[0],
            power[1],
        ]))
    }
}

/// Hash every leaf, preserving order.
pub fn leaf_hashes(leaves: &[Leaf]) -> Result<Vec<Felt>, MerkleError> {
    leaves.iter().map(Leaf::hash).collect()
}

/// Hash a sibling pair, the numerically larger element first.
pub fn hash_pair(a: &Felt, b: &Felt) -> Felt {
    // Big-endian bytes compare in numeric order.
    if a.to_bytes_be() > b.to_bytes_be() {
        compute_hash_on_elements(&[*a, *b])
    } else {
        compute_hash_on_elements(&[*b, *a])
    }
}

fn next_level(hashes: &[Felt]) -> Vec<Felt> {
    hashes
        .chunks(2)
        .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&Felt::ZERO)))
        .collect()
}

/// Root of the tree over `hashes`. A single hash is its own root.
pub fn generate_merkle_root(hashes: &[Felt]) -> Result<Felt, MerkleError> {
    if hashes.is_empty() {
        return Err(MerkleError::NoLeaves);
    }
    let mut level = hashes.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    Ok(level[0])
}

/// Sibling hashes from the leaf at `index` up to the root.
pub fn generate_merkle_proof(hashes: &[Felt], index: usize) -> Result<Vec<Felt>, MerkleError> {
    if hashes.is_empty() {
        return Err(MerkleError::NoLeaves);
    }
    if index >= hashes.len() {
        return Err(MerkleError::IndexOutOfBounds {
            index,
            len: hashes.len(),
        });
    }

    let mut proof = Vec::new();
    let mut level = hashes.to_vec();
    let mut index = index;
    while level.len() > 1 {
        let sibling = index ^ 1;
        proof.push(level.get(sibling).copied().unwrap_or(Felt::ZERO));
        level = next_level(&level);
        index /= 2;
    }
    Ok(proof)
}

/// Recompute the root from a leaf hash and its proof.
pub fn compute_merkle_root(leaf: &Felt, proof: &[Felt]) -> Felt {
    proof.iter().fold(*leaf, |current, sibling| hash_pair(&current, sibling))
}

pub fn verify_merkle_proof(root: &Felt, leaf: &Felt, proof: &[Felt]) -> bool {
    compute_merkle_root(leaf, proof) == *root
}
