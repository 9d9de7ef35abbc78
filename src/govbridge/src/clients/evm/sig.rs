//! EVM signature envelopes, forwarded to a relay for submission.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use super::{EvmAction, EvmPropose, EvmUpdateProposal, EvmVote};
use crate::{
    clients::{
        capabilities::EvmSigner,
        envelope::{Envelope, EnvelopeSignature, GovernanceAction, SignatureData},
        relay::{relay_envelope, RelayTransport},
    },
    config::EvmNetworkConfig,
    errors::{Error, Result},
    utils::{crypto::recover_address, encoding::parse_u256},
};

/// Fresh 256-bit salt; keeps otherwise identical messages from replaying.
pub(crate) fn random_salt() -> U256 {
    U256::from_be_bytes(rand::thread_rng().gen::<[u8; 32]>())
}

pub struct EvmSigClient {
    config: EvmNetworkConfig,
    signer: Option<Arc<dyn EvmSigner>>,
    relay: Option<Arc<dyn RelayTransport>>,
}

impl EvmSigClient {
    pub fn new(config: EvmNetworkConfig) -> Self {
        Self {
            config,
            signer: None,
            relay: None,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn EvmSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_relay(mut self, relay: Arc<dyn RelayTransport>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn config(&self) -> &EvmNetworkConfig {
        &self.config
    }

    fn signer(&self) -> Result<&dyn EvmSigner> {
        self.signer.as_deref().ok_or(Error::MissingSigner)
    }

    async fn sign<D: EvmAction>(&self, data: D, salt: U256) -> Result<Envelope<D>> {
        let signer = self.signer()?;
        let address = signer.address().await.map_err(Error::from_signing)?;
        let typed = data.typed_data(&self.config, address, salt);
        let digest = typed.signing_hash()?;
        tracing::debug!(
            target: "evm_sig",
            primary_type = %typed.primary_type,
            %digest,
            "requesting signature"
        );

        let signature = signer
            .sign_typed_data(&typed)
            .await
            .map_err(Error::from_signing)?;
        Ok(Envelope::signed(
            SignatureData {
                address: format!("{address:#x}"),
                signature: EnvelopeSignature::Evm(signature),
                domain: typed.domain,
                types: typed.types,
                primary_type: typed.primary_type,
                message: typed.message,
            },
            data,
        ))
    }

    pub async fn propose(&self, data: EvmPropose) -> Result<Envelope<EvmPropose>> {
        self.sign(data, random_salt()).await
    }

    pub async fn vote(&self, data: EvmVote) -> Result<Envelope<EvmVote>> {
        self.sign(data, U256::ZERO).await
    }

    pub async fn update_proposal(
        &self,
        data: EvmUpdateProposal,
    ) -> Result<Envelope<EvmUpdateProposal>> {
        self.sign(data, random_salt()).await
    }

    /// Forward a signed envelope to the relay and return its acknowledgement.
    pub async fn send<D>(&self, envelope: &Envelope<D>) -> Result<Value>
    where
        D: GovernanceAction + Serialize + Sync,
    {
        relay_envelope(self.relay.as_deref(), envelope).await
    }
}

/// Check that the envelope was signed by its `address` over the typed data its `data` produces
/// under `config`.
///
/// The salt is the only value taken from the signed message. Any difference between the shipped
/// `(domain, types, message)` and the one rebuilt from `data` fails verification.
pub fn verify_envelope<D: EvmAction>(
    config: &EvmNetworkConfig,
    envelope: &Envelope<D>,
) -> Result<bool> {
    let Some(sig) = &envelope.signature_data else {
        return Err(Error::Input("envelope carries no signature".to_string()));
    };
    let EnvelopeSignature::Evm(signature) = &sig.signature else {
        return Err(Error::Input("not an EVM signature".to_string()));
    };
    let claimed: Address = sig
        .address
        .parse()
        .map_err(|_| Error::Input(format!("invalid address {}", sig.address)))?;

    let salt = match sig.message.get("salt").and_then(Value::as_str) {
        Some(salt) => match parse_u256(salt) {
            Ok(salt) => salt,
            Err(_) => return Ok(false),
        },
        None => U256::ZERO,
    };
    let expected = envelope.data.typed_data(config, claimed, salt);
    if expected.domain != sig.domain
        || expected.types != sig.types
        || expected.primary_type != sig.primary_type
        || expected.message != sig.message
    {
        tracing::debug!(
            target: "evm_sig",
            address = %claimed,
            "envelope data does not match signed message"
        );
        return Ok(false);
    }

    let digest = match expected.signing_hash() {
        Ok(digest) => digest,
        Err(_) => return Ok(false),
    };
    Ok(recover_address(digest, signature)
        .map(|addr| addr == claimed)
        .unwrap_or(false))
}
