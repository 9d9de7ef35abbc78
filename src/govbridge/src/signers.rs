//! In-process signers backed by raw private keys.
//!
//! Meant for tooling, scripts and tests. Neither can submit transactions: that needs an RPC
//! provider, which plugs in through the capability traits instead.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use starknet_crypto::{get_public_key, rfc6979_generate_k, sign};
use starknet_types_core::felt::Felt;

use crate::{
    clients::capabilities::{EvmSigner, EvmTransactionRequest, StarknetAccount, StarknetCall},
    errors::{EncodingError, SignerError},
    typed_data::{EvmTypedData, StarknetTypedData},
    utils::{
        crypto::address_of,
        encoding::{felt_from_hex, hex_pad_left},
    },
};

pub struct LocalEvmSigner {
    key: SigningKey,
    address: Address,
}

impl LocalEvmSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// Parse a 32-byte hex private key (prefix optional).
    pub fn from_hex(private_key: &str) -> Result<Self, EncodingError> {
        let word = hex_pad_left(private_key)?;
        let bytes = hex::decode(&word[2..])
            .map_err(|_| EncodingError::InvalidHex(private_key.to_string()))?;
        let key = SigningKey::from_slice(&bytes).map_err(|_| {
            EncodingError::InvalidSignature("invalid secp256k1 private key".to_string())
        })?;
        Ok(Self::new(key))
    }

    pub fn random() -> Self {
        Self::new(SigningKey::random(&mut rand::thread_rng()))
    }

    pub fn signer_address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl EvmSigner for LocalEvmSigner {
    async fn address(&self) -> Result<Address, SignerError> {
        Ok(self.address)
    }

    async fn sign_typed_data(&self, typed_data: &EvmTypedData) -> Result<Bytes, SignerError> {
        let digest = typed_data
            .signing_hash()
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| SignerError::Failed(e.to_string()))?;

        let mut out = signature.to_bytes().to_vec();
        out.push(recovery_id.to_byte() + 27);
        Ok(out.into())
    }

    async fn send_transaction(&self, _tx: EvmTransactionRequest) -> Result<B256, SignerError> {
        Err(SignerError::Unavailable(
            "local signer has no provider to submit transactions".to_string(),
        ))
    }
}

pub struct LocalStarknetSigner {
    private_key: Felt,
    account: Felt,
}

impl LocalStarknetSigner {
    pub fn new(private_key: Felt, account: Felt) -> Self {
        Self {
            private_key,
            account,
        }
    }

    pub fn from_hex(private_key: &str, account: &str) -> Result<Self, EncodingError> {
        Ok(Self::new(felt_from_hex(private_key)?, felt_from_hex(account)?))
    }

    pub fn public_key(&self) -> Felt {
        get_public_key(&self.private_key)
    }
}

#[async_trait]
impl StarknetAccount for LocalStarknetSigner {
    fn address(&self) -> Felt {
        self.account
    }

    async fn sign_message(
        &self,
        typed_data: &StarknetTypedData,
    ) -> Result<Vec<Felt>, SignerError> {
        let hash = typed_data
            .message_hash(&self.account)
            .map_err(|e| SignerError::Failed(e.to_string()))?;
        let k = rfc6979_generate_k(&hash, &self.private_key, None);
        let signature =
            sign(&self.private_key, &hash, &k).map_err(|e| SignerError::Failed(e.to_string()))?;
        Ok(vec![signature.r, signature.s])
    }

    async fn execute(
        &self,
        _calls: &[StarknetCall],
        _max_fee: Option<Felt>,
    ) -> Result<Felt, SignerError> {
        Err(SignerError::Unavailable(
            "local signer has no provider to submit transactions".to_string(),
        ))
    }
}
