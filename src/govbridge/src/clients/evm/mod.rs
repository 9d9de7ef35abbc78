//! EVM-side actions: EIP-712 schemas, message builders and space calldata.

pub mod sig;
pub mod tx;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::sol;
use govbridge_types::{Choice, IndexedStrategy, Strategy};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    clients::envelope::GovernanceAction, config::EvmNetworkConfig, typed_data::EvmTypedData,
};

pub use sig::{verify_envelope, EvmSigClient};
pub use tx::EvmTxClient;

pub type EvmStrategy = Strategy<Address, Bytes>;
pub type EvmIndexedStrategy = IndexedStrategy<Bytes>;

sol! {
    struct SolStrategy {
        address addr;
        bytes params;
    }

    struct SolIndexedStrategy {
        uint8 index;
        bytes params;
    }

    interface ISpace {
        function propose(
            address author,
            string metadataURI,
            SolStrategy executionStrategy,
            bytes userProposalValidationParams
        ) external;

        function vote(
            address voter,
            uint256 proposalId,
            uint8 choice,
            SolIndexedStrategy[] userVotingStrategies,
            string voteMetadataURI
        ) external;

        function updateProposal(
            address author,
            uint256 proposalId,
            SolStrategy executionStrategy,
            string metadataURI
        ) external;
    }

    interface IEthTxAuthenticator {
        function authenticate(address target, bytes4 functionSelector, bytes data) external;
    }
}

impl From<&EvmStrategy> for SolStrategy {
    fn from(s: &EvmStrategy) -> Self {
        SolStrategy {
            addr: s.address,
            params: s.params.clone(),
        }
    }
}

impl From<&EvmIndexedStrategy> for SolIndexedStrategy {
    fn from(s: &EvmIndexedStrategy) -> Self {
        SolIndexedStrategy {
            index: s.index,
            params: s.params.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmPropose {
    pub space: Address,
    pub metadata_uri: String,
    pub execution_strategy: EvmStrategy,
    pub user_proposal_validation_params: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmVote {
    pub space: Address,
    pub proposal_id: U256,
    pub choice: Choice,
    pub user_voting_strategies: Vec<EvmIndexedStrategy>,
    pub metadata_uri: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmUpdateProposal {
    pub space: Address,
    pub proposal_id: U256,
    pub execution_strategy: EvmStrategy,
    pub metadata_uri: String,
}

impl GovernanceAction for EvmPropose {
    const METHOD: &'static str = "propose";
}

impl GovernanceAction for EvmVote {
    const METHOD: &'static str = "vote";
}

impl GovernanceAction for EvmUpdateProposal {
    const METHOD: &'static str = "update_proposal";
}

/// An action that is signed as EIP-712 typed data.
///
/// Signing and verification both go through [`EvmAction::typed_data`], so an envelope's
/// `data` and its signed message cannot drift apart unnoticed.
pub trait EvmAction: GovernanceAction {
    /// The typed data `signer` signs for this action. Actions without a salt ignore `salt`.
    fn typed_data(&self, config: &EvmNetworkConfig, signer: Address, salt: U256) -> EvmTypedData;
}

impl EvmAction for EvmPropose {
    fn typed_data(&self, config: &EvmNetworkConfig, signer: Address, salt: U256) -> EvmTypedData {
        propose_typed_data(config, signer, self, salt)
    }
}

impl EvmAction for EvmVote {
    fn typed_data(&self, config: &EvmNetworkConfig, signer: Address, _salt: U256) -> EvmTypedData {
        vote_typed_data(config, signer, self)
    }
}

impl EvmAction for EvmUpdateProposal {
    fn typed_data(&self, config: &EvmNetworkConfig, signer: Address, salt: U256) -> EvmTypedData {
        update_proposal_typed_data(config, signer, self, salt)
    }
}

fn hex_bytes(bytes: &Bytes) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn strategy_json(s: &EvmStrategy) -> Value {
    json!({ "addr": format!("{:#x}", s.address), "params": hex_bytes(&s.params) })
}

pub(crate) fn domain_json(config: &EvmNetworkConfig) -> Value {
    json!({
        "name": config.domain.name,
        "version": config.domain.version,
        "chainId": config.chain_id,
        "verifyingContract": format!("{:#x}", config.authenticators.eth_sig),
    })
}

pub(crate) fn propose_types() -> Value {
    json!({
        "Propose": [
            { "name": "space", "type": "address" },
            { "name": "author", "type": "address" },
            { "name": "metadataURI", "type": "string" },
            { "name": "executionStrategy", "type": "Strategy" },
            { "name": "userProposalValidationParams", "type": "bytes" },
            { "name": "salt", "type": "uint256" }
        ],
        "Strategy": [
            { "name": "addr", "type": "address" },
            { "name": "params", "type": "bytes" }
        ]
    })
}

pub(crate) fn vote_types() -> Value {
    json!({
        "Vote": [
            { "name": "space", "type": "address" },
            { "name": "voter", "type": "address" },
            { "name": "proposalId", "type": "uint256" },
            { "name": "choice", "type": "uint8" },
            { "name": "userVotingStrategies", "type": "IndexedStrategy[]" },
            { "name": "voteMetadataURI", "type": "string" }
        ],
        "IndexedStrategy": [
            { "name": "index", "type": "uint8" },
            { "name": "params", "type": "bytes" }
        ]
    })
}

pub(crate) fn update_proposal_types() -> Value {
    json!({
        "UpdateProposal": [
            { "name": "space", "type": "address" },
            { "name": "author", "type": "address" },
            { "name": "proposalId", "type": "uint256" },
            { "name": "executionStrategy", "type": "Strategy" },
            { "name": "metadataURI", "type": "string" },
            { "name": "salt", "type": "uint256" }
        ],
        "Strategy": [
            { "name": "addr", "type": "address" },
            { "name": "params", "type": "bytes" }
        ]
    })
}

pub fn propose_typed_data(
    config: &EvmNetworkConfig,
    author: Address,
    data: &EvmPropose,
    salt: U256,
) -> EvmTypedData {
    EvmTypedData {
        domain: domain_json(config),
        types: propose_types(),
        primary_type: "Propose".to_string(),
        message: json!({
            "space": format!("{:#x}", data.space),
            "author": format!("{author:#x}"),
            "metadataURI": data.metadata_uri,
            "executionStrategy": strategy_json(&data.execution_strategy),
            "userProposalValidationParams": hex_bytes(&data.user_proposal_validation_params),
            "salt": salt.to_string(),
        }),
    }
}

/// Votes carry no salt: the space accepts one vote per voter and proposal.
pub fn vote_typed_data(config: &EvmNetworkConfig, voter: Address, data: &EvmVote) -> EvmTypedData {
    let strategies: Vec<Value> = data
        .user_voting_strategies
        .iter()
        .map(|s| json!({ "index": s.index, "params": hex_bytes(&s.params) }))
        .collect();
    EvmTypedData {
        domain: domain_json(config),
        types: vote_types(),
        primary_type: "Vote".to_string(),
        message: json!({
            "space": format!("{:#x}", data.space),
            "voter": format!("{voter:#x}"),
            "proposalId": data.proposal_id.to_string(),
            "choice": u8::from(data.choice),
            "userVotingStrategies": strategies,
            "voteMetadataURI": data.metadata_uri,
        }),
    }
}

pub fn update_proposal_typed_data(
    config: &EvmNetworkConfig,
    author: Address,
    data: &EvmUpdateProposal,
    salt: U256,
) -> EvmTypedData {
    EvmTypedData {
        domain: domain_json(config),
        types: update_proposal_types(),
        primary_type: "UpdateProposal".to_string(),
        message: json!({
            "space": format!("{:#x}", data.space),
            "author": format!("{author:#x}"),
            "proposalId": data.proposal_id.to_string(),
            "executionStrategy": strategy_json(&data.execution_strategy),
            "metadataURI": data.metadata_uri,
            "salt": salt.to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{EvmAuthenticators, EvmDomainConfig};
    use alloy_sol_types::{Eip712Domain, SolStruct};
    use std::borrow::Cow;

    sol! {
        struct Strategy {
            address addr;
            bytes params;
        }

        struct Propose {
            address space;
            address author;
            string metadataURI;
            Strategy executionStrategy;
            bytes userProposalValidationParams;
            uint256 salt;
        }
    }

    pub(crate) fn config() -> EvmNetworkConfig {
        EvmNetworkConfig {
            chain_id: 11155111,
            domain: EvmDomainConfig::default(),
            authenticators: EvmAuthenticators {
                eth_sig: Address::repeat_byte(0x5e),
                eth_tx: Address::repeat_byte(0x7e),
            },
        }
    }

    #[test]
    fn test_json_schema_matches_solidity_struct_hash() {
        let data = EvmPropose {
            space: Address::repeat_byte(0x01),
            metadata_uri: "ipfs://proposal".to_string(),
            execution_strategy: EvmStrategy::new(
                Address::repeat_byte(0x02),
                Bytes::from(vec![1, 2, 3]),
            ),
            user_proposal_validation_params: Bytes::from(vec![0xff]),
        };
        let author = Address::repeat_byte(0x03);
        let salt = U256::from(123_456u64);
        let from_json = propose_typed_data(&config(), author, &data, salt)
            .signing_hash()
            .unwrap();

        let domain = Eip712Domain {
            name: Some(Cow::Borrowed("snapshot-x")),
            version: Some(Cow::Borrowed("1")),
            chain_id: Some(U256::from(11155111u64)),
            verifying_contract: Some(Address::repeat_byte(0x5e)),
            salt: None,
        };
        let sol_struct = Propose {
            space: data.space,
            author,
            metadataURI: data.metadata_uri.clone(),
            executionStrategy: Strategy {
                addr: Address::repeat_byte(0x02),
                params: Bytes::from(vec![1, 2, 3]),
            },
            userProposalValidationParams: Bytes::from(vec![0xff]),
            salt,
        };
        assert_eq!(from_json, sol_struct.eip712_signing_hash(&domain));
    }

    #[test]
    fn test_vote_digest_depends_on_choice() {
        let mut data = EvmVote {
            space: Address::repeat_byte(0x01),
            proposal_id: U256::from(1u64),
            choice: Choice::For,
            user_voting_strategies: vec![EvmIndexedStrategy::new(0, Bytes::new())],
            metadata_uri: String::new(),
        };
        let voter = Address::repeat_byte(0x09);
        let a = vote_typed_data(&config(), voter, &data).signing_hash().unwrap();
        data.choice = Choice::Against;
        let b = vote_typed_data(&config(), voter, &data).signing_hash().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_vote_ignores_salt() {
        let data = EvmVote {
            space: Address::repeat_byte(0x01),
            proposal_id: U256::from(1u64),
            choice: Choice::Abstain,
            user_voting_strategies: vec![],
            metadata_uri: String::new(),
        };
        let voter = Address::repeat_byte(0x09);
        assert_eq!(
            data.typed_data(&config(), voter, U256::ZERO),
            data.typed_data(&config(), voter, U256::from(7u64))
        );
    }
}
