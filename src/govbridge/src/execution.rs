//! Execution hash: the value an L2 vote outcome commits to.
//!
//! Each meta-transaction is hashed as EIP-712 typed data under the domain
//! `EIP712Domain(uint256 chainId,address verifyingContract)`; the aggregate hash is
//! `keccak256(abi.encode(bytes32[] txHashes))`. The L1 executor recomputes the same value from
//! the bundle it receives, so any deviation here makes legitimate executions revert.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{sol, sol_data, Eip712Domain, SolStruct, SolType};
use govbridge_types::MetaTransaction;
use serde::{Deserialize, Serialize};

use crate::utils::crypto::keccak256;

sol! {
    /// EIP-712 schema of a queued transaction. `nonce` carries the meta-transaction salt.
    struct Transaction {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 nonce;
    }

    /// ABI tuple layout of a meta-transaction inside an execution payload.
    struct MetaTransactionTuple {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 salt;
    }
}

impl From<&MetaTransaction> for Transaction {
    fn from(tx: &MetaTransaction) -> Self {
        Transaction {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: u8::from(tx.operation),
            nonce: tx.salt,
        }
    }
}

impl From<&MetaTransaction> for MetaTransactionTuple {
    fn from(tx: &MetaTransaction) -> Self {
        MetaTransactionTuple {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: u8::from(tx.operation),
            salt: tx.salt,
        }
    }
}

/// Aggregate and per-transaction hashes of a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionHash {
    pub execution_hash: B256,
    pub tx_hashes: Vec<B256>,
}

pub fn execution_domain(verifying_contract: Address, chain_id: u64) -> Eip712Domain {
    Eip712Domain {
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(verifying_contract),
        ..Default::default()
    }
}

/// EIP-712 hash of a single transaction.
pub fn transaction_hash(tx: &MetaTransaction, domain: &Eip712Domain) -> B256 {
    Transaction::from(tx).eip712_signing_hash(domain)
}

/// Hash a bundle in order. An empty bundle hashes the empty array.
pub fn create_execution_hash(
    transactions: &[MetaTransaction],
    verifying_contract: Address,
    chain_id: u64,
) -> ExecutionHash {
    let domain = execution_domain(verifying_contract, chain_id);
    let tx_hashes: Vec<B256> = transactions
        .iter()
        .map(|tx| transaction_hash(tx, &domain))
        .collect();
    let encoded = <sol_data::Array<sol_data::FixedBytes<32>>>::abi_encode(&tx_hashes);
    ExecutionHash {
        execution_hash: keccak256(encoded),
        tx_hashes,
    }
}

/// ABI-encode a bundle as `tuple(address,uint256,bytes,uint8,uint256)[]`.
pub fn encode_transactions(transactions: &[MetaTransaction]) -> Vec<u8> {
    let tuples: Vec<MetaTransactionTuple> = transactions
        .iter()
        .map(MetaTransactionTuple::from)
        .collect();
    <sol_data::Array<MetaTransactionTuple>>::abi_encode(&tuples)
}
