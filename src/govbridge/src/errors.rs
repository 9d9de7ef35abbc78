//! Error types for encoding, proof construction and envelope submission.

use thiserror::Error;

/// A stable, machine-readable identifier for an error variant.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

/// Errors during numeric / hex canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Integer outside the representable domain (negative, >= 2^256, or >= the field prime).
    #[error("value out of range: {0}")]
    Range(String),
    #[error("invalid hex string `{0}`")]
    InvalidHex(String),
    #[error("invalid integer `{0}`")]
    InvalidInteger(String),
    #[error("invalid short string `{0}`")]
    InvalidShortString(String),
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// Errors during Merkle root / proof construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("at least one leaf is required")]
    NoLeaves,
    #[error("leaf index {index} out of bounds for {len} leaves")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Errors while encoding or hashing typed data.
#[derive(Debug, Error)]
pub enum TypedDataError {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("missing field `{field}` in `{ty}`")]
    MissingField { ty: String, field: String },
    #[error("invalid value for `{ty}`: {reason}")]
    InvalidValue { ty: String, reason: String },
    #[error("eip-712 encoding failed: {0}")]
    Eip712(String),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Errors reported by a signer or account capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The user declined the request.
    #[error("request rejected by signer: {0}")]
    Rejected(String),
    /// The capability does not support this operation.
    #[error("operation unavailable: {0}")]
    Unavailable(String),
    #[error("signer failure: {0}")]
    Failed(String),
}

/// Error reported by a chain-query capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ChainQueryError(pub String);

impl From<ChainQueryError> for Error {
    fn from(err: ChainQueryError) -> Self {
        Error::ChainQuery(err.0)
    }
}

/// Top-level error for the client layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Input(String),
    #[error("no signer available")]
    MissingSigner,
    #[error("signature rejected: {0}")]
    SignatureRejected(String),
    #[error("relay request failed: {0}")]
    RelayFailure(String),
    #[error("transaction failed: {0}")]
    TransactionFailure(String),
    #[error("chain query failed: {0}")]
    ChainQuery(String),
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error(transparent)]
    TypedData(#[from] TypedDataError),
}

impl Error {
    /// Map a signer error raised while signing.
    pub(crate) fn from_signing(err: SignerError) -> Self {
        match err {
            SignerError::Rejected(msg) => Error::SignatureRejected(msg),
            other => Error::RelayFailure(other.to_string()),
        }
    }

    /// Map a signer error raised while submitting a transaction.
    pub(crate) fn from_submission(err: SignerError) -> Self {
        match err {
            SignerError::Rejected(msg) => Error::SignatureRejected(msg),
            other => Error::TransactionFailure(other.to_string()),
        }
    }

    /// True for caller mistakes detected before any external call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Input(_) | Error::Encoding(_) | Error::Merkle(_) | Error::TypedData(_)
        )
    }
}

impl ErrorCode for Error {
    fn code(&self) -> &'static str {
        match self {
            Self::Input(_) | Self::Encoding(_) | Self::Merkle(_) | Self::TypedData(_) => {
                "INPUT_ERROR"
            }
            Self::MissingSigner => "MISSING_SIGNER",
            Self::SignatureRejected(_) => "SIGNATURE_REJECTED",
            Self::RelayFailure(_) => "RELAY_FAILURE",
            Self::TransactionFailure(_) => "TRANSACTION_FAILURE",
            Self::ChainQuery(_) => "CHAIN_QUERY_FAILURE",
            Self::UnsupportedConfiguration(_) => "UNSUPPORTED_CONFIGURATION",
        }
    }
}

impl ErrorCode for EncodingError {
    fn code(&self) -> &'static str {
        match self {
            Self::Range(_) => "RANGE_ERROR",
            Self::InvalidHex(_) => "INVALID_HEX",
            Self::InvalidInteger(_) => "INVALID_INTEGER",
            Self::InvalidShortString(_) => "INVALID_SHORT_STRING",
            Self::InvalidSignature(_) => "INVALID_SIGNATURE",
        }
    }
}

impl ErrorCode for MerkleError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoLeaves => "MERKLE_NO_LEAVES",
            Self::IndexOutOfBounds { .. } => "MERKLE_INDEX_OUT_OF_BOUNDS",
            Self::Encoding(e) => e.code(),
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
