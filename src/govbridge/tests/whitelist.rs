use alloy_primitives::{Address, B256, U256};
use govbridge::{
    compute_merkle_root, create_execution_hash, generate_merkle_proof, generate_merkle_root,
    get_execution_data, get_storage_var_address,
    merkle::leaf_hashes,
    storage::ADDR_BOUND,
    utils::encoding::{felt_from_hex, felt_to_u256},
    verify_merkle_proof, ExecutionInput, Leaf,
};
use govbridge_types::{AddressKind, ExecutorKind, MetaTransaction};
use starknet_types_core::felt::Felt;

fn whitelist(powers: [u64; 3]) -> Vec<Leaf> {
    // Fixed address order: leaves are assigned to voters by ascending address.
    [0x1111u64, 0x2222, 0x3333]
        .into_iter()
        .zip(powers)
        .map(|(address, power)| {
            Leaf::new(
                AddressKind::Ethereum,
                U256::from(address),
                U256::from(power),
            )
        })
        .collect()
}

fn felt(hex: &str) -> Felt {
    felt_from_hex(hex).unwrap()
}

#[test]
fn test_whitelist_known_answers() {
    let hashes = leaf_hashes(&whitelist([10, 20, 30])).unwrap();
    assert_eq!(
        hashes[1],
        felt("0x3d2f9459b6f76a043e6a733d36a74a1d730ef06d22b71b33fafb799763354e2")
    );
    assert_eq!(
        generate_merkle_root(&hashes).unwrap(),
        felt("0x3e753f07c498399db169a818d06ffed19baa0e22745f1f7ade894264ef7bee1")
    );
}

#[test]
fn test_execution_hash_known_answer() {
    let bundle = vec![MetaTransaction::call(
        Address::repeat_byte(0x42),
        U256::from(1u64),
    )];
    let hash = create_execution_hash(&bundle, Address::repeat_byte(0xde), 1);
    let b256 = |hex: &str| hex.parse::<B256>().unwrap();
    assert_eq!(
        hash.tx_hashes,
        vec![b256("0xf99b1e330ceea0cdd869705b63879c0c4b61e941534dc87a819c11ec31fc4017")]
    );
    assert_eq!(
        hash.execution_hash,
        b256("0xaff0ab7091c7af7b941fa50f9ad5a02b89d0d81cdcb7928ad6d75f6f138f838f")
    );
}

#[test]
fn test_whitelist_root_proof_and_power_change() {
    let hashes = leaf_hashes(&whitelist([10, 20, 30])).unwrap();
    let root = generate_merkle_root(&hashes).unwrap();

    let proof = generate_merkle_proof(&hashes, 1).unwrap();
    assert_eq!(proof.len(), 2);
    assert_eq!(compute_merkle_root(&hashes[1], &proof), root);
    assert!(verify_merkle_proof(&root, &hashes[1], &proof));

    let changed = leaf_hashes(&whitelist([10, 21, 30])).unwrap();
    let changed_root = generate_merkle_root(&changed).unwrap();
    assert_ne!(changed_root, root);
    assert!(!verify_merkle_proof(&changed_root, &hashes[1], &proof));
}

#[test]
fn test_every_voter_can_prove_membership() {
    let hashes = leaf_hashes(&whitelist([10, 20, 30])).unwrap();
    let root = generate_merkle_root(&hashes).unwrap();
    for index in 0..hashes.len() {
        let proof = generate_merkle_proof(&hashes, index).unwrap();
        assert!(verify_merkle_proof(&root, &hashes[index], &proof), "leaf {index}");
    }
    assert!(generate_merkle_proof(&hashes, 3).is_err());
}

#[test]
fn test_storage_addresses_stay_in_range() {
    let base = get_storage_var_address::<&str>("_commits", &[]).unwrap();
    assert_eq!(base, get_storage_var_address::<&str>("_commits", &[]).unwrap());

    let a = get_storage_var_address("_commits", &["0x1"]).unwrap();
    let b = get_storage_var_address("_commits", &["0x2"]).unwrap();
    assert_ne!(a, b);
    for slot in [base, a, b] {
        assert!(felt_to_u256(&slot) < ADDR_BOUND);
    }
}

#[test]
fn test_executor_dispatch() {
    let bundle = vec![MetaTransaction::call(
        Address::repeat_byte(0x42),
        U256::from(1u64),
    )];

    let input = ExecutionInput::with_transactions(bundle.clone());
    let vanilla = get_execution_data(ExecutorKind::Vanilla, "0x01", Some(&input)).unwrap();
    assert!(vanilla.execution_params.is_empty());

    for kind in [ExecutorKind::Avatar, ExecutorKind::EthRelayer] {
        let err = get_execution_data(kind, "0x02", None).unwrap_err();
        assert!(matches!(err, govbridge::Error::UnsupportedConfiguration(_)), "{kind}");
    }

    let relayed = get_execution_data(
        ExecutorKind::EthRelayer,
        "0x03",
        Some(&ExecutionInput::relayed(bundle, Address::repeat_byte(0xde), 1)),
    )
    .unwrap();
    assert_eq!(relayed.execution_params.len(), 3);
    assert_eq!(
        relayed.execution_params[0],
        format!("{:#x}", Address::repeat_byte(0xde))
    );
}
