//! Starknet-side actions: SNIP-12 schemas, message builders and Cairo calldata.

pub mod l1_commit;
pub mod sig;
pub mod tx;

use alloy_primitives::U256;
use govbridge_types::{Choice, IndexedStrategy, Strategy};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use starknet_types_core::felt::Felt;

use crate::{
    clients::envelope::GovernanceAction,
    config::StarknetNetworkConfig,
    typed_data::{type_definitions, StarknetTypedData, TypeDefinitions},
    utils::encoding::{felt_to_hex, long_string_to_felts, SplitUint256},
};

pub use l1_commit::L1CommitClient;
pub use sig::{verify_envelope, StarknetSigClient};
pub use tx::StarknetTxClient;

pub type StarknetStrategy = Strategy<Felt, Vec<Felt>>;
pub type StarknetIndexedStrategy = IndexedStrategy<Vec<Felt>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetPropose {
    pub space: Felt,
    pub metadata_uri: String,
    pub execution_strategy: StarknetStrategy,
    pub user_proposal_validation_params: Vec<Felt>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetVote {
    pub space: Felt,
    pub proposal_id: U256,
    pub choice: Choice,
    pub user_voting_strategies: Vec<StarknetIndexedStrategy>,
    pub metadata_uri: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetUpdateProposal {
    pub space: Felt,
    pub proposal_id: U256,
    pub execution_strategy: StarknetStrategy,
    pub metadata_uri: String,
}

impl GovernanceAction for StarknetPropose {
    const METHOD: &'static str = "propose";
}

impl GovernanceAction for StarknetVote {
    const METHOD: &'static str = "vote";
}

impl GovernanceAction for StarknetUpdateProposal {
    const METHOD: &'static str = "update_proposal";
}

/// An action that is signed as SNIP-12 typed data.
///
/// Signing and verification both go through [`StarknetAction::typed_data`], so an envelope's
/// `data` and its signed message cannot drift apart unnoticed.
pub trait StarknetAction: GovernanceAction {
    /// The typed data `signer` signs for this action. Actions without a salt ignore `salt`.
    fn typed_data(
        &self,
        config: &StarknetNetworkConfig,
        signer: &Felt,
        salt: &Felt,
    ) -> StarknetTypedData;
}

impl StarknetAction for StarknetPropose {
    fn typed_data(
        &self,
        config: &StarknetNetworkConfig,
        signer: &Felt,
        salt: &Felt,
    ) -> StarknetTypedData {
        propose_typed_data(config, signer, self, salt)
    }
}

impl StarknetAction for StarknetVote {
    fn typed_data(
        &self,
        config: &StarknetNetworkConfig,
        signer: &Felt,
        _salt: &Felt,
    ) -> StarknetTypedData {
        vote_typed_data(config, signer, self)
    }
}

impl StarknetAction for StarknetUpdateProposal {
    fn typed_data(
        &self,
        config: &StarknetNetworkConfig,
        signer: &Felt,
        salt: &Felt,
    ) -> StarknetTypedData {
        update_proposal_typed_data(config, signer, self, salt)
    }
}

/// Fresh salt of 31 random bytes, always below the field prime.
pub(crate) fn random_felt_salt() -> Felt {
    let mut buf = [0u8; 32];
    rand::thread_rng().fill(&mut buf[1..]);
    Felt::from_bytes_be(&buf)
}

const DOMAIN_FIELDS: &[(&str, &str)] = &[
    ("name", "felt252"),
    ("version", "felt252"),
    ("chainId", "felt252"),
    ("verifyingContract", "ContractAddress"),
];
const STRATEGY_FIELDS: &[(&str, &str)] = &[("address", "felt252"), ("params", "felt*")];
const INDEXED_STRATEGY_FIELDS: &[(&str, &str)] = &[("index", "felt252"), ("params", "felt*")];
const U256_FIELDS: &[(&str, &str)] = &[("low", "felt252"), ("high", "felt252")];

pub(crate) fn propose_types() -> TypeDefinitions {
    type_definitions(&[
        ("StarkNetDomain", DOMAIN_FIELDS),
        (
            "Propose",
            &[
                ("space", "ContractAddress"),
                ("author", "ContractAddress"),
                ("metadataUri", "felt*"),
                ("executionStrategy", "Strategy"),
                ("userProposalValidationParams", "felt*"),
                ("salt", "felt252"),
            ],
        ),
        ("Strategy", STRATEGY_FIELDS),
    ])
}

pub(crate) fn vote_types() -> TypeDefinitions {
    type_definitions(&[
        ("StarkNetDomain", DOMAIN_FIELDS),
        (
            "Vote",
            &[
                ("space", "ContractAddress"),
                ("voter", "ContractAddress"),
                ("proposalId", "u256"),
                ("choice", "felt252"),
                ("userVotingStrategies", "UserStrategy*"),
                ("metadataUri", "felt*"),
            ],
        ),
        ("UserStrategy", INDEXED_STRATEGY_FIELDS),
        ("u256", U256_FIELDS),
    ])
}

pub(crate) fn update_proposal_types() -> TypeDefinitions {
    type_definitions(&[
        ("StarkNetDomain", DOMAIN_FIELDS),
        (
            "UpdateProposal",
            &[
                ("space", "ContractAddress"),
                ("author", "ContractAddress"),
                ("proposalId", "u256"),
                ("executionStrategy", "Strategy"),
                ("metadataUri", "felt*"),
                ("salt", "felt252"),
            ],
        ),
        ("Strategy", STRATEGY_FIELDS),
        ("u256", U256_FIELDS),
    ])
}

pub(crate) fn domain_json(config: &StarknetNetworkConfig) -> Value {
    json!({
        "name": config.domain.name,
        "version": config.domain.version,
        "chainId": felt_to_hex(&config.chain_id),
        "verifyingContract": felt_to_hex(&config.authenticators.stark_sig),
    })
}

fn felts_json(felts: &[Felt]) -> Vec<String> {
    felts.iter().map(felt_to_hex).collect()
}

fn u256_json(value: U256) -> Value {
    let split = SplitUint256::from_uint(value);
    json!({ "low": split.low_hex(), "high": split.high_hex() })
}

fn strategy_json(s: &StarknetStrategy) -> Value {
    json!({ "address": felt_to_hex(&s.address), "params": felts_json(&s.params) })
}

pub fn propose_typed_data(
    config: &StarknetNetworkConfig,
    author: &Felt,
    data: &StarknetPropose,
    salt: &Felt,
) -> StarknetTypedData {
    StarknetTypedData {
        types: propose_types(),
        primary_type: "Propose".to_string(),
        domain: domain_json(config),
        message: json!({
            "space": felt_to_hex(&data.space),
            "author": felt_to_hex(author),
            "metadataUri": felts_json(&long_string_to_felts(&data.metadata_uri)),
            "executionStrategy": strategy_json(&data.execution_strategy),
            "userProposalValidationParams": felts_json(&data.user_proposal_validation_params),
            "salt": felt_to_hex(salt),
        }),
    }
}

pub fn vote_typed_data(
    config: &StarknetNetworkConfig,
    voter: &Felt,
    data: &StarknetVote,
) -> StarknetTypedData {
    let strategies: Vec<Value> = data
        .user_voting_strategies
        .iter()
        .map(|s| json!({ "index": s.index, "params": felts_json(&s.params) }))
        .collect();
    StarknetTypedData {
        types: vote_types(),
        primary_type: "Vote".to_string(),
        domain: domain_json(config),
        message: json!({
            "space": felt_to_hex(&data.space),
            "voter": felt_to_hex(voter),
            "proposalId": u256_json(data.proposal_id),
            "choice": u8::from(data.choice),
            "userVotingStrategies": strategies,
            "metadataUri": felts_json(&long_string_to_felts(&data.metadata_uri)),
        }),
    }
}

pub fn update_proposal_typed_data(
    config: &StarknetNetworkConfig,
    author: &Felt,
    data: &StarknetUpdateProposal,
    salt: &Felt,
) -> StarknetTypedData {
    StarknetTypedData {
        types: update_proposal_types(),
        primary_type: "UpdateProposal".to_string(),
        domain: domain_json(config),
        message: json!({
            "space": felt_to_hex(&data.space),
            "author": felt_to_hex(author),
            "proposalId": u256_json(data.proposal_id),
            "executionStrategy": strategy_json(&data.execution_strategy),
            "metadataUri": felts_json(&long_string_to_felts(&data.metadata_uri)),
            "salt": felt_to_hex(salt),
        }),
    }
}

/// Cairo serialization: arrays are length-prefixed, `u256` is `low, high`.
fn push_array(out: &mut Vec<Felt>, items: &[Felt]) {
    out.push(Felt::from(items.len() as u64));
    out.extend_from_slice(items);
}

fn push_strategy(out: &mut Vec<Felt>, s: &StarknetStrategy) {
    out.push(s.address);
    push_array(out, &s.params);
}

fn push_u256(out: &mut Vec<Felt>, value: U256) {
    out.extend(SplitUint256::from_uint(value).to_felts());
}

/// `(space, author, metadata_uri, execution_strategy, user_proposal_validation_params)`.
pub fn propose_calldata(author: &Felt, data: &StarknetPropose) -> Vec<Felt> {
    let mut out = vec![data.space, *author];
    push_array(&mut out, &long_string_to_felts(&data.metadata_uri));
    push_strategy(&mut out, &data.execution_strategy);
    push_array(&mut out, &data.user_proposal_validation_params);
    out
}

/// `(space, voter, proposal_id, choice, user_voting_strategies, metadata_uri)`.
pub fn vote_calldata(voter: &Felt, data: &StarknetVote) -> Vec<Felt> {
    let mut out = vec![data.space, *voter];
    push_u256(&mut out, data.proposal_id);
    out.push(Felt::from(u8::from(data.choice)));
    out.push(Felt::from(data.user_voting_strategies.len() as u64));
    for s in &data.user_voting_strategies {
        out.push(Felt::from(s.index));
        push_array(&mut out, &s.params);
    }
    push_array(&mut out, &long_string_to_felts(&data.metadata_uri));
    out
}

/// `(space, author, proposal_id, execution_strategy, metadata_uri)`.
pub fn update_proposal_calldata(author: &Felt, data: &StarknetUpdateProposal) -> Vec<Felt> {
    let mut out = vec![data.space, *author];
    push_u256(&mut out, data.proposal_id);
    push_strategy(&mut out, &data.execution_strategy);
    push_array(&mut out, &long_string_to_felts(&data.metadata_uri));
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        config::{StarknetAuthenticators, StarknetDomainConfig},
        utils::{crypto::compute_hash_on_elements, encoding::short_string_to_felt},
    };
    use alloy_primitives::Address;

    pub(crate) fn config() -> StarknetNetworkConfig {
        StarknetNetworkConfig {
            chain_id: short_string_to_felt("SN_SEPOLIA").unwrap(),
            domain: StarknetDomainConfig::default(),
            authenticators: StarknetAuthenticators {
                stark_sig: Felt::from(0x5151u64),
                stark_tx: Felt::from(0x7171u64),
                eth_tx: Felt::from(0xe7e7u64),
            },
            l1_commit: Address::repeat_byte(0x1c),
        }
    }

    pub(crate) fn vote() -> StarknetVote {
        StarknetVote {
            space: Felt::from(0xaau64),
            proposal_id: U256::from(3u64),
            choice: Choice::For,
            user_voting_strategies: vec![StarknetIndexedStrategy::new(
                1,
                vec![Felt::from(7u64)],
            )],
            metadata_uri: String::new(),
        }
    }

    #[test]
    fn test_vote_calldata_layout() {
        let calldata = vote_calldata(&Felt::from(0xbbu64), &vote());
        let expected: Vec<Felt> = [0xaa_u64, 0xbb, 3, 0, 1, 1, 1, 1, 7, 0]
            .into_iter()
            .map(Felt::from)
            .collect();
        assert_eq!(calldata, expected);
    }

    #[test]
    fn test_propose_calldata_prefixes_lengths() {
        let data = StarknetPropose {
            space: Felt::from(1u64),
            metadata_uri: "a".repeat(40),
            execution_strategy: StarknetStrategy::new(
                Felt::from(2u64),
                vec![Felt::from(3u64), Felt::from(4u64)],
            ),
            user_proposal_validation_params: vec![],
        };
        let calldata = propose_calldata(&Felt::from(9u64), &data);
        // space, author, uri len + 2 chunks, strategy address, params len + 2 params, empty array
        assert_eq!(calldata.len(), 2 + 1 + 2 + 1 + 1 + 2 + 1);
        assert_eq!(calldata[2], Felt::from(2u64));
        assert_eq!(calldata[6], Felt::from(2u64));
        assert_eq!(calldata[9], Felt::ZERO);
    }

    #[test]
    fn test_vote_message_hash_includes_u256_struct() {
        let cfg = config();
        let typed = vote_typed_data(&cfg, &Felt::from(0xbbu64), &vote());
        assert_eq!(
            typed.encode_type("Vote").unwrap(),
            "Vote(space:ContractAddress,voter:ContractAddress,proposalId:u256,choice:felt252,\
             userVotingStrategies:UserStrategy*,metadataUri:felt*)UserStrategy(index:felt252,params:felt*)\
             u256(low:felt252,high:felt252)"
        );
        let proposal_id = typed.struct_hash("u256", &typed.message["proposalId"]).unwrap();
        assert_eq!(
            proposal_id,
            compute_hash_on_elements(&[
                typed.type_hash("u256").unwrap(),
                Felt::from(3u64),
                Felt::ZERO,
            ])
        );
    }

    #[test]
    fn test_salt_changes_propose_hash() {
        let cfg = config();
        let data = StarknetPropose {
            space: Felt::from(1u64),
            metadata_uri: "ipfs://x".to_string(),
            execution_strategy: StarknetStrategy::new(Felt::from(2u64), vec![]),
            user_proposal_validation_params: vec![],
        };
        let author = Felt::from(5u64);
        let hash = || {
            propose_typed_data(&cfg, &author, &data, &random_felt_salt())
                .message_hash(&author)
                .unwrap()
        };
        assert_ne!(hash(), hash());
    }

    #[test]
    fn test_vote_ignores_salt() {
        let cfg = config();
        let voter = Felt::from(0xbbu64);
        assert_eq!(
            vote().typed_data(&cfg, &voter, &Felt::ONE),
            vote().typed_data(&cfg, &voter, &Felt::from(2u64))
        );
    }
}
