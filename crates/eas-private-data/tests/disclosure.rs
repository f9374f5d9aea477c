//! # Selective Disclosure Tests
//!
//! End-to-end checks of the producer/verifier flow: build a tree, publish
//! the root, disclose a subset, verify the subset with nothing but the root.
//!
//! The fixed vectors below were computed independently from the standard
//! double-hashed leaf and sorted-pair tree construction. If they drift, trees
//! built here stop matching on-chain `multiProofVerify`.

use alloy_primitives::{Address, Bytes, B256, U256};
use eas_core::{MerkleInput, SaltedValue, TypeTag, TypedValue, Value};
use eas_private_data::{
    verify_full_tree, verify_multi_proof, FullTree, PrivateData, PrivateDataError,
    PrivateMultiProof,
};
use proptest::prelude::*;

const SCENARIO_ROOT: &str = "0xc12274a89abc8c8c801b39996f00fd5731918fbfd25e824609f629d5ddd73bf9";
const LEAF_A: &str = "0x11e1d5f35b6098f37ed780eb0732cb49f122cfc65e814db813868b3e0c60d893";
const LEAF_B: &str = "0xe5a529d486e751f68484e4d97909506a3b8363cc7582497ae0aaffcead6567da";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("eas_private_data=debug"))
        .with_test_writer()
        .try_init();
}

fn b256(hex: &str) -> B256 {
    hex.parse().unwrap()
}

fn salted(tag: TypeTag, name: &str, value: impl Into<Value>, salt: u8) -> SaltedValue {
    TypedValue::new(tag, name, value)
        .unwrap()
        .with_salt(B256::repeat_byte(salt))
}

/// `[{string a "x" 0x11..}, {uint256 b 42 0x22..}]`
fn scenario() -> Vec<SaltedValue> {
    vec![
        salted(TypeTag::String, "a", "x", 0x11),
        salted(TypeTag::UINT256, "b", 42u64, 0x22),
    ]
}

fn profile() -> Vec<TypedValue> {
    vec![
        TypedValue::new(TypeTag::String, "name", "Alice").unwrap(),
        TypedValue::new(TypeTag::Uint(8), "age", 37u64).unwrap(),
        TypedValue::new(TypeTag::Bool, "kyc", true).unwrap(),
        TypedValue::new(TypeTag::Address, "wallet", Address::repeat_byte(0xab)).unwrap(),
        TypedValue::new(TypeTag::Bytes, "photo", Bytes::from(vec![0xff; 70])).unwrap(),
        TypedValue::new(TypeTag::Bytes32, "docHash", B256::repeat_byte(0x5a)).unwrap(),
    ]
}

// ---------------------------------------------------------------------------
// Fixed vectors
// ---------------------------------------------------------------------------

#[test]
fn scenario_root_is_fixed() {
    init_tracing();
    let tree = PrivateData::rebuild_from_disclosed(scenario()).unwrap();
    assert_eq!(tree.root(), b256(SCENARIO_ROOT));
    assert_eq!(eas_private_data::leaf_hash(&scenario()[0]).unwrap(), b256(LEAF_A));
    assert_eq!(eas_private_data::leaf_hash(&scenario()[1]).unwrap(), b256(LEAF_B));
}

#[test]
fn scenario_proof_discloses_exactly_one_value() {
    init_tracing();
    let tree = PrivateData::rebuild_from_disclosed(scenario()).unwrap();
    let proof = tree.generate_multi_proof(&[0]).unwrap();

    assert_eq!(proof.leaves, vec![scenario()[0].clone()]);
    assert_eq!(proof.proof, vec![b256(LEAF_B)]);
    assert_eq!(proof.proof_flags, vec![false]);
    assert!(verify_multi_proof(&b256(SCENARIO_ROOT), &proof).unwrap());
}

#[test]
fn scenario_from_wire_inputs() {
    let json = serde_json::json!([
        {
            "type": "string",
            "name": "a",
            "value": "x",
            "salt": format!("0x{}", "11".repeat(32)),
        },
        {
            "type": "uint256",
            "name": "b",
            "value": 42,
            "salt": format!("0x{}", "22".repeat(32)),
        },
    ]);
    let inputs: Vec<MerkleInput> = serde_json::from_value(json).unwrap();
    let tree = PrivateData::from_inputs(inputs).unwrap();
    assert_eq!(tree.root(), b256(SCENARIO_ROOT));
}

// ---------------------------------------------------------------------------
// Tampering
// ---------------------------------------------------------------------------

fn disclosed() -> (B256, PrivateMultiProof) {
    let tree = PrivateData::build_fresh(profile()).unwrap();
    let proof = tree.generate_multi_proof(&[0, 1, 4]).unwrap();
    assert!(verify_multi_proof(&tree.root(), &proof).unwrap());
    (tree.root(), proof)
}

fn assert_rejected(tamper: impl Fn(&mut SaltedValue)) {
    let (root, proof) = disclosed();
    for i in 0..proof.leaves.len() {
        let mut forged = proof.clone();
        tamper(&mut forged.leaves[i]);
        assert!(!verify_multi_proof(&root, &forged).unwrap(), "leaf {i} accepted");
    }
}

#[test]
fn tampered_value_rejected() {
    assert_rejected(|leaf| {
        leaf.value = match &leaf.value {
            Value::String(s) => Value::String(format!("{s}!")),
            Value::Uint(n) => Value::Uint(*n + U256::from(1)),
            Value::Bytes(b) => Value::Bytes(Bytes::from([b.as_ref(), &[0u8][..]].concat())),
            other => other.clone(),
        };
    });
}

#[test]
fn tampered_name_rejected() {
    assert_rejected(|leaf| leaf.name.push('_'));
}

#[test]
fn tampered_salt_rejected() {
    assert_rejected(|leaf| leaf.salt.0[31] ^= 1);
}

#[test]
fn tampered_type_rejected() {
    let tree = PrivateData::rebuild_from_disclosed(scenario()).unwrap();
    let mut proof = tree.generate_multi_proof(&[1]).unwrap();
    assert_eq!(proof.leaves[0].type_tag, TypeTag::UINT256);
    proof.leaves[0].type_tag = TypeTag::Uint(128);
    assert!(!verify_multi_proof(&tree.root(), &proof).unwrap());
}

#[test]
fn swapped_proof_sibling_rejected() {
    let (root, mut proof) = disclosed();
    proof.proof[0] = B256::repeat_byte(0xee);
    assert!(!verify_multi_proof(&root, &proof).unwrap());
}

#[test]
fn leaf_with_wrong_value_kind_is_an_error() {
    let tree = PrivateData::rebuild_from_disclosed(scenario()).unwrap();
    let mut proof = tree.generate_multi_proof(&[0]).unwrap();
    proof.leaves[0].type_tag = TypeTag::Bytes;
    assert!(matches!(
        verify_multi_proof(&tree.root(), &proof),
        Err(PrivateDataError::Codec(_))
    ));
}

// ---------------------------------------------------------------------------
// Full disclosure and wire format
// ---------------------------------------------------------------------------

#[test]
fn full_tree_round_trips_through_json() {
    let tree = PrivateData::build_fresh(profile()).unwrap();
    let full = tree.get_full_tree();

    let json = serde_json::to_value(&full).unwrap();
    assert!(json["root"].as_str().unwrap().starts_with("0x"));
    assert_eq!(json["values"][1]["type"], "uint8");
    assert_eq!(json["values"][1]["value"], "37");

    let back: FullTree = serde_json::from_value(json).unwrap();
    assert_eq!(back, full);
    assert_eq!(verify_full_tree(&back).unwrap(), tree.root());
}

#[test]
fn multi_proof_round_trips_through_json() {
    let (root, proof) = disclosed();
    let json = serde_json::to_string(&proof).unwrap();
    assert!(json.contains("\"proofFlags\""));
    let back: PrivateMultiProof = serde_json::from_str(&json).unwrap();
    assert_eq!(back, proof);
    assert!(verify_multi_proof(&root, &back).unwrap());
}

#[test]
fn unsalted_full_tree_rejected_on_the_wire() {
    let json = serde_json::json!({
        "root": SCENARIO_ROOT,
        "values": [{ "type": "string", "name": "a", "value": "x" }],
    });
    assert!(serde_json::from_value::<FullTree>(json).is_err());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn typed_value() -> impl Strategy<Value = TypedValue> {
    prop_oneof![
        any::<bool>().prop_map(|b| TypedValue::new(TypeTag::Bool, "flag", b).unwrap()),
        any::<u64>().prop_map(|n| TypedValue::new(TypeTag::UINT256, "count", n).unwrap()),
        "[a-z]{0,12}".prop_map(|s| TypedValue::new(TypeTag::String, "label", s).unwrap()),
        any::<[u8; 20]>().prop_map(|a| {
            TypedValue::new(TypeTag::Address, "owner", Address::from(a)).unwrap()
        }),
    ]
}

fn values_and_subset() -> impl Strategy<Value = (Vec<TypedValue>, Vec<usize>)> {
    prop::collection::vec(typed_value(), 1..12).prop_flat_map(|values| {
        let indexes: Vec<usize> = (0..values.len()).collect();
        let n = values.len();
        (
            Just(values),
            prop::sample::subsequence(indexes, 1..=n).prop_shuffle(),
        )
    })
}

proptest! {
    /// Any non-empty subset of any tree verifies against its root.
    #[test]
    fn every_subset_verifies((values, subset) in values_and_subset()) {
        let tree = PrivateData::build_fresh(values).unwrap();
        let proof = tree.generate_multi_proof(&subset).unwrap();

        prop_assert_eq!(proof.leaves.len(), subset.len());
        for leaf in &proof.leaves {
            prop_assert!(tree.values().contains(leaf));
        }
        prop_assert!(verify_multi_proof(&tree.root(), &proof).unwrap());
    }

    /// Identical salted tuples always commit to the same root.
    #[test]
    fn rebuild_is_deterministic(values in prop::collection::vec(typed_value(), 1..10)) {
        let tree = PrivateData::build_fresh(values).unwrap();
        let again = PrivateData::rebuild_from_disclosed(tree.values().to_vec()).unwrap();
        prop_assert_eq!(again.root(), tree.root());
        prop_assert_eq!(verify_full_tree(&tree.get_full_tree()).unwrap(), tree.root());
    }
}
