//! Executor strategy resolution: executor kind + bundle -> calldata shape.

use alloy_primitives::{Address, U256};
use govbridge_types::{ExecutionPayload, ExecutorKind, MetaTransaction};

use crate::{
    errors::{Error, Result},
    execution::{create_execution_hash, encode_transactions},
    utils::encoding::SplitUint256,
};

/// Optional inputs an executor may need.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionInput {
    pub transactions: Option<Vec<MetaTransaction>>,
    /// L1 executor the relayed execution hash is destined for.
    pub destination: Option<Address>,
    /// Chain id of the destination, part of the execution-hash domain.
    pub chain_id: Option<u64>,
}

impl ExecutionInput {
    pub fn with_transactions(transactions: Vec<MetaTransaction>) -> Self {
        Self {
            transactions: Some(transactions),
            ..Default::default()
        }
    }

    pub fn relayed(
        transactions: Vec<MetaTransaction>,
        destination: Address,
        chain_id: u64,
    ) -> Self {
        Self {
            transactions: Some(transactions),
            destination: Some(destination),
            chain_id: Some(chain_id),
        }
    }
}

fn insufficient(kind: ExecutorKind, executor: &str, missing: &str) -> Error {
    Error::UnsupportedConfiguration(format!(
        "insufficient data to build execution for {kind} executor {executor}: missing {missing}"
    ))
}

/// Build the payload `executor` expects for `kind`.
///
/// `Vanilla` ignores any input. Every other kind fails if its required inputs are absent.
pub fn get_execution_data(
    kind: ExecutorKind,
    executor: &str,
    input: Option<&ExecutionInput>,
) -> Result<ExecutionPayload> {
    let transactions: &[MetaTransaction] = match input.and_then(|i| i.transactions.as_deref()) {
        Some(transactions) => transactions,
        None if kind.requires_transactions() => {
            return Err(insufficient(kind, executor, "transactions"));
        }
        None => &[],
    };
    let execution_params = match kind {
        ExecutorKind::Vanilla => vec![],
        ExecutorKind::Avatar | ExecutorKind::Timelock => {
            vec![format!("0x{}", hex::encode(encode_transactions(transactions)))]
        }
        ExecutorKind::EthRelayer => {
            let destination = input
                .and_then(|i| i.destination)
                .ok_or_else(|| insufficient(kind, executor, "destination"))?;
            let chain_id = input
                .and_then(|i| i.chain_id)
                .ok_or_else(|| insufficient(kind, executor, "chain id"))?;

            let hash = create_execution_hash(transactions, destination, chain_id);
            let split = SplitUint256::from_uint(U256::from_be_bytes(hash.execution_hash.0));
            vec![
                format!("{destination:#x}"),
                split.low_hex(),
                split.high_hex(),
            ]
        }
    };
    Ok(ExecutionPayload {
        executor: executor.to_string(),
        execution_params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> Vec<MetaTransaction> {
        vec![MetaTransaction::call(
            Address::repeat_byte(0x42),
            U256::from(7u64),
        )]
    }

    #[test]
    fn test_vanilla_ignores_bundle() {
        let input = ExecutionInput::with_transactions(bundle());
        let payload = get_execution_data(ExecutorKind::Vanilla, "0x1", Some(&input)).unwrap();
        assert_eq!(payload.executor, "0x1");
        assert!(payload.execution_params.is_empty());

        let payload = get_execution_data(ExecutorKind::Vanilla, "0x1", None).unwrap();
        assert!(payload.execution_params.is_empty());
    }

    #[test]
    fn test_missing_bundle_is_unsupported() {
        for kind in ExecutorKind::ALL {
            let result = get_execution_data(kind, "0xabc", None);
            assert_eq!(result.is_err(), kind.requires_transactions(), "{kind}");
            if !kind.requires_transactions() {
                continue;
            }
            assert!(matches!(result, Err(Error::UnsupportedConfiguration(_))), "{kind}");

            let empty = ExecutionInput::default();
            let err = get_execution_data(kind, "0xabc", Some(&empty)).unwrap_err();
            assert!(err.to_string().contains("missing transactions"));
        }
    }

    #[test]
    fn test_relayer_requires_destination() {
        let input = ExecutionInput::with_transactions(bundle());
        let err = get_execution_data(ExecutorKind::EthRelayer, "0xabc", Some(&input)).unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn test_avatar_encodes_bundle() {
        let input = ExecutionInput::with_transactions(bundle());
        let payload = get_execution_data(ExecutorKind::Avatar, "0xabc", Some(&input)).unwrap();
        let encoded = format!("0x{}", hex::encode(encode_transactions(&bundle())));
        assert_eq!(payload.execution_params, vec![encoded]);
    }

    #[test]
    fn test_relayer_splits_hash() {
        let destination = Address::repeat_byte(0x0d);
        let input = ExecutionInput::relayed(bundle(), destination, 11155111);
        let payload = get_execution_data(ExecutorKind::EthRelayer, "0x5", Some(&input)).unwrap();
        assert_eq!(payload.execution_params.len(), 3);
        assert_eq!(payload.execution_params[0], format!("{destination:#x}"));

        let hash = create_execution_hash(&bundle(), destination, 11155111).execution_hash;
        let word = |hex: &str| U256::from_str_radix(hex.trim_start_matches("0x"), 16).unwrap();
        let low = word(&payload.execution_params[1]);
        let high = word(&payload.execution_params[2]);
        assert_eq!((high << 128) | low, U256::from_be_bytes(hash.0));
    }
}
