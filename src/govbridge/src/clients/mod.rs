//! Envelope clients: one per (ledger, mode) pair, plus the capabilities they consume.

pub mod capabilities;
pub mod envelope;
pub mod evm;
pub mod relay;
pub mod starknet;

pub use capabilities::{
    EvmSigner, EvmTransactionRequest, L1ToL2Message, StarknetAccount, StarknetCall,
    StarknetChainQuery,
};
pub use envelope::{
    Envelope, EnvelopeSignature, GovernanceAction, SignatureData, SubmittedTransaction,
};
pub use evm::{EvmSigClient, EvmTxClient};
pub use relay::{HttpRelay, RelayTransport};
pub use starknet::{L1CommitClient, StarknetSigClient, StarknetTxClient};
