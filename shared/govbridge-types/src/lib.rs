//! Shared governance types (ledger-agnostic).
//!
//! Everything in here is plain data: the encoders in `govbridge` consume these types and the
//! tooling (de)serializes them from JSON.

pub mod executors;
pub mod strategies;
pub mod transactions;
pub mod voting;

pub use executors::{ExecutionPayload, ExecutorKind, UnknownExecutorKind};
pub use strategies::{IndexedStrategy, Strategy};
pub use transactions::{MetaTransaction, Operation};
pub use voting::{AddressKind, Choice, UnknownDiscriminant};
