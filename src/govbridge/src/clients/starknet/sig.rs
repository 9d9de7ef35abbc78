//! Starknet signature envelopes (SNIP-12), forwarded to a relay for submission.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use starknet_types_core::felt::Felt;

use super::{
    random_felt_salt, StarknetAction, StarknetPropose, StarknetUpdateProposal, StarknetVote,
};
use crate::{
    clients::{
        capabilities::StarknetAccount,
        envelope::{Envelope, EnvelopeSignature, GovernanceAction, SignatureData},
        relay::{relay_envelope, RelayTransport},
    },
    config::StarknetNetworkConfig,
    errors::{Error, Result},
    utils::encoding::{felt_from_hex, felt_to_hex},
};

pub struct StarknetSigClient {
    config: StarknetNetworkConfig,
    account: Option<Arc<dyn StarknetAccount>>,
    relay: Option<Arc<dyn RelayTransport>>,
}

impl StarknetSigClient {
    pub fn new(config: StarknetNetworkConfig) -> Self {
        Self {
            config,
            account: None,
            relay: None,
        }
    }

    pub fn with_account(mut self, account: Arc<dyn StarknetAccount>) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_relay(mut self, relay: Arc<dyn RelayTransport>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn config(&self) -> &StarknetNetworkConfig {
        &self.config
    }

    fn account(&self) -> Result<&dyn StarknetAccount> {
        self.account.as_deref().ok_or(Error::MissingSigner)
    }

    async fn sign<D: StarknetAction>(&self, data: D, salt: Felt) -> Result<Envelope<D>> {
        let account = self.account()?;
        let address = account.address();
        let typed = data.typed_data(&self.config, &address, &salt);
        let hash = typed.message_hash(&address)?;
        tracing::debug!(
            target: "starknet_sig",
            primary_type = %typed.primary_type,
            hash = %felt_to_hex(&hash),
            "requesting signature"
        );

        let signature = account
            .sign_message(&typed)
            .await
            .map_err(Error::from_signing)?;
        let types = serde_json::to_value(&typed.types).map_err(|e| Error::Input(e.to_string()))?;
        Ok(Envelope::signed(
            SignatureData {
                address: felt_to_hex(&address),
                signature: EnvelopeSignature::Starknet(signature),
                domain: typed.domain,
                types,
                primary_type: typed.primary_type,
                message: typed.message,
            },
            data,
        ))
    }

    pub async fn propose(&self, data: StarknetPropose) -> Result<Envelope<StarknetPropose>> {
        self.sign(data, random_felt_salt()).await
    }

    pub async fn vote(&self, data: StarknetVote) -> Result<Envelope<StarknetVote>> {
        self.sign(data, Felt::ZERO).await
    }

    pub async fn update_proposal(
        &self,
        data: StarknetUpdateProposal,
    ) -> Result<Envelope<StarknetUpdateProposal>> {
        self.sign(data, random_felt_salt()).await
    }

    /// Forward a signed envelope to the relay and return its acknowledgement.
    pub async fn send<D>(&self, envelope: &Envelope<D>) -> Result<Value>
    where
        D: GovernanceAction + Serialize + Sync,
    {
        relay_envelope(self.relay.as_deref(), envelope).await
    }
}

/// Check an `[r, s]` envelope signature against the account's STARK public key.
///
/// The signed typed data is rebuilt from the envelope's `data` under `config`, with only the
/// salt taken from the shipped message; any mismatch fails verification. Accounts may use other
/// signature schemes; this covers the standard single-key account.
pub fn verify_envelope<D: StarknetAction>(
    config: &StarknetNetworkConfig,
    envelope: &Envelope<D>,
    public_key: &Felt,
) -> Result<bool> {
    let Some(sig) = &envelope.signature_data else {
        return Err(Error::Input("envelope carries no signature".to_string()));
    };
    let EnvelopeSignature::Starknet(signature) = &sig.signature else {
        return Err(Error::Input("not a Starknet signature".to_string()));
    };
    let [r, s] = signature.as_slice() else {
        return Ok(false);
    };
    let account = felt_from_hex(&sig.address)?;

    let salt = match sig.message.get("salt").and_then(Value::as_str) {
        Some(salt) => match felt_from_hex(salt) {
            Ok(salt) => salt,
            Err(_) => return Ok(false),
        },
        None => Felt::ZERO,
    };
    let expected = envelope.data.typed_data(config, &account, &salt);
    let types = serde_json::to_value(&expected.types).map_err(|e| Error::Input(e.to_string()))?;
    if types != sig.types
        || expected.domain != sig.domain
        || expected.primary_type != sig.primary_type
        || expected.message != sig.message
    {
        tracing::debug!(
            target: "starknet_sig",
            account = %felt_to_hex(&account),
            "envelope data does not match signed message"
        );
        return Ok(false);
    }

    let hash = match expected.message_hash(&account) {
        Ok(hash) => hash,
        Err(_) => return Ok(false),
    };
    Ok(starknet_crypto::verify(public_key, &hash, r, s).unwrap_or(false))
}
