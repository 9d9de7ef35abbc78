//! Capabilities the clients consume but do not implement: signers, accounts and chain queries.
//!
//! Wallets, hardware signers and RPC providers live outside this crate; they plug in through
//! these traits. [`crate::signers`] has local key implementations for tooling and tests.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

use crate::{
    errors::{ChainQueryError, SignerError},
    typed_data::{EvmTypedData, StarknetTypedData},
};

/// A transaction an EVM signer should submit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransactionRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// EVM account able to sign typed data and submit transactions.
#[async_trait]
pub trait EvmSigner: Send + Sync {
    async fn address(&self) -> Result<Address, SignerError>;

    /// 65-byte `r || s || v` signature over the EIP-712 digest of `typed_data`.
    async fn sign_typed_data(&self, typed_data: &EvmTypedData) -> Result<Bytes, SignerError>;

    /// Submit a transaction and return its hash.
    async fn send_transaction(&self, tx: EvmTransactionRequest) -> Result<B256, SignerError>;
}

/// A single Starknet contract invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarknetCall {
    pub to: Felt,
    pub selector: Felt,
    pub calldata: Vec<Felt>,
}

/// Starknet account able to sign typed data and execute calls.
#[async_trait]
pub trait StarknetAccount: Send + Sync {
    fn address(&self) -> Felt;

    /// Signature felts (`[r, s]` for standard accounts) over the typed-data message hash.
    async fn sign_message(&self, typed_data: &StarknetTypedData) -> Result<Vec<Felt>, SignerError>;

    /// Execute `calls` in one transaction and return its hash.
    async fn execute(
        &self,
        calls: &[StarknetCall],
        max_fee: Option<Felt>,
    ) -> Result<Felt, SignerError>;
}

/// An L1 -> L2 message, as used for fee estimation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L1ToL2Message {
    pub from_address: Address,
    pub to_address: Felt,
    pub entry_point_selector: Felt,
    pub payload: Vec<Felt>,
}

/// Read-only Starknet queries. Implementations should be idempotent; callers may retry.
#[async_trait]
pub trait StarknetChainQuery: Send + Sync {
    async fn get_nonce(&self, account: &Felt) -> Result<Felt, ChainQueryError>;

    async fn get_storage_at(&self, contract: &Felt, key: &Felt) -> Result<Felt, ChainQueryError>;

    /// Fee for `sender` invoking `calls` as its transaction number `nonce`.
    async fn estimate_invoke_fee(
        &self,
        sender: &Felt,
        nonce: &Felt,
        calls: &[StarknetCall],
    ) -> Result<Felt, ChainQueryError>;

    /// Fee (in wei) the L1 sender must attach for `message` to be consumed on L2.
    async fn estimate_message_fee(&self, message: &L1ToL2Message) -> Result<U256, ChainQueryError>;
}
