//! Starknet direct transactions through the StarkTx authenticator.

use std::sync::Arc;

use starknet_types_core::felt::Felt;

use super::{
    propose_calldata, update_proposal_calldata, vote_calldata, StarknetPropose,
    StarknetUpdateProposal, StarknetVote,
};
use crate::{
    clients::{
        capabilities::{StarknetAccount, StarknetCall, StarknetChainQuery},
        envelope::{Envelope, SubmittedTransaction},
    },
    config::StarknetNetworkConfig,
    errors::{Error, Result},
    utils::{crypto::selector_from_name, encoding::felt_to_hex},
};

pub struct StarknetTxClient {
    config: StarknetNetworkConfig,
    account: Option<Arc<dyn StarknetAccount>>,
    chain: Option<Arc<dyn StarknetChainQuery>>,
}

impl StarknetTxClient {
    pub fn new(config: StarknetNetworkConfig) -> Self {
        Self {
            config,
            account: None,
            chain: None,
        }
    }

    pub fn with_account(mut self, account: Arc<dyn StarknetAccount>) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_chain_query(mut self, chain: Arc<dyn StarknetChainQuery>) -> Self {
        self.chain = Some(chain);
        self
    }

    fn account(&self) -> Result<&dyn StarknetAccount> {
        self.account.as_deref().ok_or(Error::MissingSigner)
    }

    fn authenticator_call(&self, entrypoint: &str, calldata: Vec<Felt>) -> StarknetCall {
        StarknetCall {
            to: self.config.authenticators.stark_tx,
            selector: selector_from_name(entrypoint),
            calldata,
        }
    }

    /// Invoke fee of `calls` at the account's current nonce.
    async fn estimate_fee(&self, sender: &Felt, calls: &[StarknetCall]) -> Result<Felt> {
        let chain = self.chain.as_deref().ok_or_else(|| {
            Error::UnsupportedConfiguration(
                "fee estimation requires a chain query provider".to_string(),
            )
        })?;
        let nonce = chain.get_nonce(sender).await?;
        let fee = chain.estimate_invoke_fee(sender, &nonce, calls).await?;
        tracing::debug!(
            target: "starknet_tx",
            nonce = %felt_to_hex(&nonce),
            fee = %felt_to_hex(&fee),
            "estimated invoke fee"
        );
        Ok(fee)
    }

    /// Execute `call` from `account`, optionally capping the fee at the current estimate.
    async fn execute(
        &self,
        account: &dyn StarknetAccount,
        call: StarknetCall,
        estimate_fee: bool,
    ) -> Result<SubmittedTransaction> {
        let calls = [call];
        let max_fee = if estimate_fee {
            Some(self.estimate_fee(&account.address(), &calls).await?)
        } else {
            None
        };

        let hash = account
            .execute(&calls, max_fee)
            .await
            .map_err(Error::from_submission)?;
        tracing::info!(
            target: "starknet_tx",
            authenticator = %felt_to_hex(&calls[0].to),
            tx = %felt_to_hex(&hash),
            "transaction submitted"
        );
        Ok(SubmittedTransaction {
            transaction_hash: felt_to_hex(&hash),
        })
    }

    pub async fn propose(
        &self,
        data: StarknetPropose,
        estimate_fee: bool,
    ) -> Result<(Envelope<StarknetPropose>, SubmittedTransaction)> {
        let account = self.account()?;
        let calldata = propose_calldata(&account.address(), &data);
        let call = self.authenticator_call("authenticate_propose", calldata);
        let tx = self.execute(account, call, estimate_fee).await?;
        Ok((Envelope::unsigned(data), tx))
    }

    pub async fn vote(
        &self,
        data: StarknetVote,
        estimate_fee: bool,
    ) -> Result<(Envelope<StarknetVote>, SubmittedTransaction)> {
        let account = self.account()?;
        let calldata = vote_calldata(&account.address(), &data);
        let call = self.authenticator_call("authenticate_vote", calldata);
        let tx = self.execute(account, call, estimate_fee).await?;
        Ok((Envelope::unsigned(data), tx))
    }

    pub async fn update_proposal(
        &self,
        data: StarknetUpdateProposal,
        estimate_fee: bool,
    ) -> Result<(Envelope<StarknetUpdateProposal>, SubmittedTransaction)> {
        let account = self.account()?;
        let calldata = update_proposal_calldata(&account.address(), &data);
        let call = self.authenticator_call("authenticate_update_proposal", calldata);
        let tx = self.execute(account, call, estimate_fee).await?;
        Ok((Envelope::unsigned(data), tx))
    }
}
