//! Cross-ledger governance encoding for an EVM / Starknet voting protocol.
//!
//! The pure layer produces byte-exact artifacts that on-chain contracts verify without
//! re-executing anything:
//! - numeric canonicalization between 256-bit words and Starknet felts ([`utils::encoding`]),
//! - Merkle whitelists of voting power ([`merkle`]),
//! - EIP-712 execution hashes over meta-transaction bundles ([`execution`]),
//! - Starknet storage slot addresses ([`storage`]),
//! - executor payloads ([`executors`]).
//!
//! The client layer ([`clients`]) wraps Propose / Vote / UpdateProposal into signed or
//! submitted envelopes. Signing keys, accounts, RPC providers and the relay are capabilities
//! supplied by the caller.

pub mod clients;
pub mod config;
pub mod errors;
pub mod execution;
pub mod executors;
pub mod merkle;
pub mod signers;
pub mod storage;
pub mod typed_data;
pub mod utils;


pub use errors::{Error, ErrorCode, Result};
pub use execution::{create_execution_hash, ExecutionHash};
pub use executors::{get_execution_data, ExecutionInput};
pub use merkle::{
    compute_merkle_root, generate_merkle_proof, generate_merkle_root, verify_merkle_proof, Leaf,
};
pub use storage::{get_storage_var_address, offset_storage_var};
pub use utils::encoding::SplitUint256;
