use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::voting::UnknownDiscriminant;

/// Call type used by avatar-style executors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

impl TryFrom<u8> for Operation {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(UnknownDiscriminant {
                kind: "operation",
                value: other,
            }),
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op as u8
    }
}

/// A transaction queued for execution once a proposal passes.
///
/// Order inside a bundle is significant: the execution hash commits to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    /// Hashed under the field name `nonce` by the execution-hash schema.
    pub salt: U256,
}

impl MetaTransaction {
    /// Plain call with no value and no calldata.
    pub fn call(to: Address, salt: U256) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data: Bytes::new(),
            operation: Operation::Call,
            salt,
        }
    }
}
