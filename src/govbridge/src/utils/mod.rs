//! Shared encoding and hashing helpers.
//!
//! Everything here is pure and deterministic.

pub mod crypto;
pub mod encoding;
