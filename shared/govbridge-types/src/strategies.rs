use serde::{Deserialize, Serialize};

/// Strategy reference by contract address, with its encoded parameters.
///
/// `A` is the ledger's address type, `P` its parameter encoding (ABI bytes on EVM, a felt
/// array on Starknet).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy<A, P> {
    pub address: A,
    pub params: P,
}

impl<A, P> Strategy<A, P> {
    pub fn new(address: A, params: P) -> Self {
        Self { address, params }
    }
}

/// Strategy reference by index into the space's strategy list.
///
/// Signed messages carry indices instead of addresses to keep them bounded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedStrategy<P> {
    pub index: u8,
    pub params: P,
}

impl<P> IndexedStrategy<P> {
    pub fn new(index: u8, params: P) -> Self {
        Self { index, params }
    }
}
