//! Typed-data hashing for both ledgers.

pub mod evm;
pub mod starknet;

pub use evm::EvmTypedData;
pub use starknet::{type_definitions, StarknetTypedData, TypeDefinitions, TypedDataField};
