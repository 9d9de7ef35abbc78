//! Starknet spaces driven from L1: an EVM account commits the Poseidon hash of a space call to
//! the commit contract, which forwards `(author, hash)` to the EthTx authenticator over the
//! L1 -> L2 bridge. The authenticator later accepts the matching call from anyone.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use starknet_types_core::felt::Felt;

use super::{
    propose_calldata, update_proposal_calldata, vote_calldata, StarknetPropose,
    StarknetUpdateProposal, StarknetVote,
};
use crate::{
    clients::{
        capabilities::{EvmSigner, EvmTransactionRequest, L1ToL2Message, StarknetChainQuery},
        envelope::SubmittedTransaction,
    },
    config::StarknetNetworkConfig,
    errors::{EncodingError, Error, Result},
    storage::storage_var_address,
    utils::{
        crypto::{poseidon_hash, selector_from_name},
        encoding::{felt_to_hex, felt_to_u256},
    },
};

sol! {
    interface IStarknetCommit {
        function commit(uint256 _hash) external payable;
    }
}

/// Storage variable of the EthTx authenticator mapping commit hashes to their L1 author.
pub const COMMITS_STORAGE_VAR: &str = "_commits";

/// L1 handler on the EthTx authenticator that receives forwarded commits.
pub const COMMIT_HANDLER: &str = "commit";

pub fn address_to_felt(address: Address) -> Felt {
    Felt::from_bytes_be_slice(address.as_slice())
}

/// Read a felt back as an EVM address; values wider than 160 bits are rejected.
pub fn felt_to_address(felt: &Felt) -> Result<Address, EncodingError> {
    let word = felt_to_u256(felt);
    if word.bit_len() > 160 {
        return Err(EncodingError::Range(format!(
            "{} is not an EVM address",
            felt_to_hex(felt)
        )));
    }
    Ok(Address::from_word(word.to_be_bytes::<32>().into()))
}

/// `poseidon([space, selector(entrypoint), ...args])`, where `calldata` starts with the space.
fn space_call_hash(entrypoint: &str, calldata: &[Felt]) -> Felt {
    let mut preimage = Vec::with_capacity(calldata.len() + 1);
    if let Some((space, args)) = calldata.split_first() {
        preimage.push(*space);
        preimage.push(selector_from_name(entrypoint));
        preimage.extend_from_slice(args);
    }
    poseidon_hash(&preimage)
}

pub fn get_propose_hash(author: Address, data: &StarknetPropose) -> Felt {
    space_call_hash("propose", &propose_calldata(&address_to_felt(author), data))
}

pub fn get_vote_hash(voter: Address, data: &StarknetVote) -> Felt {
    space_call_hash("vote", &vote_calldata(&address_to_felt(voter), data))
}

pub fn get_update_proposal_hash(author: Address, data: &StarknetUpdateProposal) -> Felt {
    let calldata = update_proposal_calldata(&address_to_felt(author), data);
    space_call_hash("update_proposal", &calldata)
}

pub struct L1CommitClient {
    config: StarknetNetworkConfig,
    signer: Option<Arc<dyn EvmSigner>>,
    chain: Option<Arc<dyn StarknetChainQuery>>,
}

impl L1CommitClient {
    pub fn new(config: StarknetNetworkConfig) -> Self {
        Self {
            config,
            signer: None,
            chain: None,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn EvmSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_chain_query(mut self, chain: Arc<dyn StarknetChainQuery>) -> Self {
        self.chain = Some(chain);
        self
    }

    fn signer(&self) -> Result<&dyn EvmSigner> {
        self.signer.as_deref().ok_or(Error::MissingSigner)
    }

    fn chain(&self) -> Result<&dyn StarknetChainQuery> {
        self.chain.as_deref().ok_or_else(|| {
            Error::UnsupportedConfiguration("L1 commits require a chain query provider".to_string())
        })
    }

    /// The L1 -> L2 message `commit(hash)` produces.
    pub fn commit_message(&self, author: Address, hash: Felt) -> L1ToL2Message {
        L1ToL2Message {
            from_address: self.config.l1_commit,
            to_address: self.config.authenticators.eth_tx,
            entry_point_selector: selector_from_name(COMMIT_HANDLER),
            payload: vec![address_to_felt(author), hash],
        }
    }

    /// Fee in wei to attach to `commit(hash)`.
    pub async fn estimate_fee(&self, author: Address, hash: Felt) -> Result<U256> {
        let message = self.commit_message(author, hash);
        let fee = self.chain()?.estimate_message_fee(&message).await?;
        tracing::debug!(
            target: "l1_commit",
            hash = %felt_to_hex(&hash),
            %fee,
            "estimated message fee"
        );
        Ok(fee)
    }

    pub async fn estimate_propose_fee(
        &self,
        author: Address,
        data: &StarknetPropose,
    ) -> Result<U256> {
        self.estimate_fee(author, get_propose_hash(author, data)).await
    }

    pub async fn estimate_vote_fee(&self, voter: Address, data: &StarknetVote) -> Result<U256> {
        self.estimate_fee(voter, get_vote_hash(voter, data)).await
    }

    pub async fn estimate_update_proposal_fee(
        &self,
        author: Address,
        data: &StarknetUpdateProposal,
    ) -> Result<U256> {
        self.estimate_fee(author, get_update_proposal_hash(author, data)).await
    }

    async fn commit(
        &self,
        signer: &dyn EvmSigner,
        author: Address,
        hash: Felt,
    ) -> Result<SubmittedTransaction> {
        let fee = self.estimate_fee(author, hash).await?;
        let data: Bytes = IStarknetCommit::commitCall {
            _hash: felt_to_u256(&hash),
        }
        .abi_encode()
        .into();
        let tx = signer
            .send_transaction(EvmTransactionRequest {
                to: self.config.l1_commit,
                data,
                value: fee,
            })
            .await
            .map_err(Error::from_submission)?;
        tracing::info!(target: "l1_commit", hash = %felt_to_hex(&hash), %tx, "commit submitted");
        Ok(SubmittedTransaction {
            transaction_hash: tx.to_string(),
        })
    }

    /// Commit a propose call from the signer's address; returns the committed hash and the L1 tx.
    pub async fn initialize_propose(
        &self,
        data: &StarknetPropose,
    ) -> Result<(Felt, SubmittedTransaction)> {
        let signer = self.signer()?;
        let author = signer.address().await.map_err(Error::from_submission)?;
        let hash = get_propose_hash(author, data);
        Ok((hash, self.commit(signer, author, hash).await?))
    }

    pub async fn initialize_vote(
        &self,
        data: &StarknetVote,
    ) -> Result<(Felt, SubmittedTransaction)> {
        let signer = self.signer()?;
        let voter = signer.address().await.map_err(Error::from_submission)?;
        let hash = get_vote_hash(voter, data);
        Ok((hash, self.commit(signer, voter, hash).await?))
    }

    pub async fn initialize_update_proposal(
        &self,
        data: &StarknetUpdateProposal,
    ) -> Result<(Felt, SubmittedTransaction)> {
        let signer = self.signer()?;
        let author = signer.address().await.map_err(Error::from_submission)?;
        let hash = get_update_proposal_hash(author, data);
        Ok((hash, self.commit(signer, author, hash).await?))
    }

    /// Author recorded for a consumed-or-pending commit, `None` if the slot is empty.
    pub async fn get_commit_author(&self, hash: Felt) -> Result<Option<Address>> {
        let key = storage_var_address(COMMITS_STORAGE_VAR, &[hash]);
        let value = self
            .chain()?
            .get_storage_at(&self.config.authenticators.eth_tx, &key)
            .await?;
        if value == Felt::ZERO {
            return Ok(None);
        }
        Ok(Some(felt_to_address(&value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::starknet::tests::vote;
    use crate::clients::starknet::StarknetStrategy;

    #[test]
    fn test_hash_preimage_inserts_selector_after_space() {
        let voter = Address::repeat_byte(0x0b);
        let data = vote();
        let calldata = vote_calldata(&address_to_felt(voter), &data);
        let mut preimage = vec![calldata[0], selector_from_name("vote")];
        preimage.extend_from_slice(&calldata[1..]);
        assert_eq!(get_vote_hash(voter, &data), poseidon_hash(&preimage));
    }

    #[test]
    fn test_hashes_differ_per_action_and_author() {
        let data = StarknetPropose {
            space: Felt::from(1u64),
            metadata_uri: String::new(),
            execution_strategy: StarknetStrategy::new(Felt::from(2u64), vec![]),
            user_proposal_validation_params: vec![],
        };
        let a = get_propose_hash(Address::repeat_byte(1), &data);
        assert_ne!(a, get_propose_hash(Address::repeat_byte(2), &data));

        let update = StarknetUpdateProposal {
            space: data.space,
            proposal_id: U256::ZERO,
            execution_strategy: data.execution_strategy.clone(),
            metadata_uri: String::new(),
        };
        assert_ne!(a, get_update_proposal_hash(Address::repeat_byte(1), &update));
    }

    #[test]
    fn test_address_felt_roundtrip() {
        let address = Address::repeat_byte(0xab);
        assert_eq!(felt_to_address(&address_to_felt(address)).unwrap(), address);
        let too_wide = Felt::from_hex("0x10000000000000000000000000000000000000000").unwrap();
        assert!(felt_to_address(&too_wide).is_err());
    }
}
