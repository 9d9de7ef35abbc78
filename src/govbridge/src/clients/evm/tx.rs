//! EVM direct transactions, authenticated by `msg.sender` through the EthTx authenticator.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::SolCall;

use super::{
    EvmPropose, EvmUpdateProposal, EvmVote, IEthTxAuthenticator, ISpace, SolIndexedStrategy,
    SolStrategy,
};
use crate::{
    clients::{
        capabilities::{EvmSigner, EvmTransactionRequest},
        envelope::{Envelope, SubmittedTransaction},
    },
    config::EvmNetworkConfig,
    errors::{Error, Result},
};

/// `authenticate(space, selector, args)` where `args` is the call's ABI-encoded parameters.
fn authenticate_calldata<C: SolCall>(space: Address, call: &C) -> Bytes {
    IEthTxAuthenticator::authenticateCall {
        target: space,
        functionSelector: FixedBytes(C::SELECTOR),
        data: Bytes::from(call.abi_encode()[4..].to_vec()),
    }
    .abi_encode()
    .into()
}

pub fn propose_calldata(author: Address, data: &EvmPropose) -> Bytes {
    let call = ISpace::proposeCall {
        author,
        metadataURI: data.metadata_uri.clone(),
        executionStrategy: SolStrategy::from(&data.execution_strategy),
        userProposalValidationParams: data.user_proposal_validation_params.clone(),
    };
    authenticate_calldata(data.space, &call)
}

pub fn vote_calldata(voter: Address, data: &EvmVote) -> Bytes {
    let call = ISpace::voteCall {
        voter,
        proposalId: data.proposal_id,
        choice: u8::from(data.choice),
        userVotingStrategies: data
            .user_voting_strategies
            .iter()
            .map(SolIndexedStrategy::from)
            .collect(),
        voteMetadataURI: data.metadata_uri.clone(),
    };
    authenticate_calldata(data.space, &call)
}

pub fn update_proposal_calldata(author: Address, data: &EvmUpdateProposal) -> Bytes {
    let call = ISpace::updateProposalCall {
        author,
        proposalId: data.proposal_id,
        executionStrategy: SolStrategy::from(&data.execution_strategy),
        metadataURI: data.metadata_uri.clone(),
    };
    authenticate_calldata(data.space, &call)
}

pub struct EvmTxClient {
    config: EvmNetworkConfig,
    signer: Option<Arc<dyn EvmSigner>>,
}

impl EvmTxClient {
    pub fn new(config: EvmNetworkConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn EvmSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    fn signer(&self) -> Result<&dyn EvmSigner> {
        self.signer.as_deref().ok_or(Error::MissingSigner)
    }

    async fn submit(&self, signer: &dyn EvmSigner, data: Bytes) -> Result<SubmittedTransaction> {
        let to = self.config.authenticators.eth_tx;
        let hash = signer
            .send_transaction(EvmTransactionRequest {
                to,
                data,
                value: U256::ZERO,
            })
            .await
            .map_err(Error::from_submission)?;
        tracing::info!(target: "evm_tx", authenticator = %to, tx = %hash, "transaction submitted");
        Ok(SubmittedTransaction {
            transaction_hash: hash.to_string(),
        })
    }

    pub async fn propose(
        &self,
        data: EvmPropose,
    ) -> Result<(Envelope<EvmPropose>, SubmittedTransaction)> {
        let signer = self.signer()?;
        let author = signer.address().await.map_err(Error::from_submission)?;
        let tx = self.submit(signer, propose_calldata(author, &data)).await?;
        Ok((Envelope::unsigned(data), tx))
    }

    pub async fn vote(&self, data: EvmVote) -> Result<(Envelope<EvmVote>, SubmittedTransaction)> {
        let signer = self.signer()?;
        let voter = signer.address().await.map_err(Error::from_submission)?;
        let tx = self.submit(signer, vote_calldata(voter, &data)).await?;
        Ok((Envelope::unsigned(data), tx))
    }

    pub async fn update_proposal(
        &self,
        data: EvmUpdateProposal,
    ) -> Result<(Envelope<EvmUpdateProposal>, SubmittedTransaction)> {
        let signer = self.signer()?;
        let author = signer.address().await.map_err(Error::from_submission)?;
        let tx = self
            .submit(signer, update_proposal_calldata(author, &data))
            .await?;
        Ok((Envelope::unsigned(data), tx))
    }
}
