use proptest::collection;
use proptest::prelude::*;

use treap_accumulator_merkle::{
    compress_tree_for, find, insert, is_treap, join, join_proofs, prove_exclusion,
    prove_inclusion, remove, verify_exclusion, verify_inclusion, Node, TreapError,
};
use treap_accumulator_types::{Hasher, Key, Sha256Hasher};

fn key_for(n: u32) -> Key {
    Key::from_digest(&Sha256Hasher::hash(&n.to_le_bytes()))
}

#[test]
fn inclusion_proof_round_trips() {
    let mut t = None;

    for n in [1u32, 2, 3, 4, 5] {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    let root = t.as_ref().unwrap().merkle_root();

    for n in [1u32, 2, 3, 4, 5] {
        let proof = prove_inclusion(&t, key_for(n)).unwrap();
        assert!(verify_inclusion(&proof, root, key_for(n)).is_ok());
    }
}

#[test]
fn exclusion_proof_round_trips() {
    let mut t = None;

    for n in [10u32, 20, 30] {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    let root = t.as_ref().unwrap().merkle_root();
    let missing = key_for(999);

    let proof = prove_exclusion(&t, missing).unwrap();
    assert!(verify_exclusion(&proof, root, missing).is_ok());
}

#[test]
fn compressed_proof_rejects_mutation() {
    let mut t = None;

    for n in [1u32, 2, 3, 4, 5, 6, 7] {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    let proof = compress_tree_for(&t, key_for(1)).unwrap();

    // the proof hides most of the tree; inserting a key that requires
    // descending into a hidden sibling must fail, never silently succeed.
    let result = insert(proof, key_for(999));
    assert_eq!(result.unwrap_err(), TreapError::TouchedCompressedNode);
}

#[test]
fn join_two_inclusion_proofs_covers_both_keys() {
    let mut t = None;

    for n in [1u32, 2, 3, 4, 5] {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    let root = t.as_ref().unwrap().merkle_root();

    let p1 = prove_inclusion(&t, key_for(1)).unwrap();
    let p2 = prove_inclusion(&t, key_for(5)).unwrap();

    let joined = join(p1, p2).unwrap();

    assert!(verify_inclusion(&joined, root, key_for(1)).is_ok());
    assert!(verify_inclusion(&joined, root, key_for(5)).is_ok());
}

#[test]
fn join_proofs_folds_over_many() {
    let mut t = None;

    for n in 0u32..10 {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    let root = t.as_ref().unwrap().merkle_root();

    let proofs: Vec<_> = (0u32..10)
        .map(|n| prove_inclusion(&t, key_for(n)).unwrap())
        .collect();

    let joined = join_proofs(proofs).unwrap();

    for n in 0u32..10 {
        assert!(verify_inclusion(&joined, root, key_for(n)).is_ok());
    }
}

#[test]
fn remove_then_reinsert_restores_root() {
    let mut t = None;

    for n in [1u32, 2, 3] {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    let root_before = t.as_ref().unwrap().merkle_root();

    let t2 = remove(t.clone(), key_for(2)).unwrap();
    let t3 = insert(t2, key_for(2)).unwrap();

    assert_eq!(t3.as_ref().unwrap().merkle_root(), root_before);
}

#[test]
fn freshly_built_tree_validates_as_treap() {
    let mut t = None;

    for n in 0u32..30 {
        t = insert::<Sha256Hasher>(t, key_for(n)).unwrap();
    }

    assert!(is_treap(&t).is_ok());
}

proptest! {
    #[test]
    fn insertion_order_never_affects_merkle_root(
        numbers in collection::vec(0u32..10_000, 1..60),
    ) {
        let unique: Vec<u32> = {
            let mut v = numbers.clone();
            v.sort_unstable();
            v.dedup();
            v
        };

        let mut forward = None;
        for n in &unique {
            forward = insert::<Sha256Hasher>(forward, key_for(*n)).unwrap();
        }

        let mut backward = None;
        for n in unique.iter().rev() {
            backward = insert::<Sha256Hasher>(backward, key_for(*n)).unwrap();
        }

        let root_forward = forward.as_ref().map(Node::merkle_root);
        let root_backward = backward.as_ref().map(Node::merkle_root);

        prop_assert_eq!(root_forward, root_backward);
        prop_assert!(is_treap(&forward).is_ok());
    }

    #[test]
    fn inclusion_and_exclusion_proofs_are_sound(
        numbers in collection::vec(0u32..10_000, 1..60),
        probe in 0u32..10_000,
    ) {
        let unique: Vec<u32> = {
            let mut v = numbers;
            v.sort_unstable();
            v.dedup();
            v
        };

        let mut t = None;
        for n in &unique {
            t = insert::<Sha256Hasher>(t, key_for(*n)).unwrap();
        }

        let root = t.as_ref().unwrap().merkle_root();
        let probe_key = key_for(probe);

        if find(&t, probe_key).unwrap().is_some() {
            let proof = prove_inclusion(&t, probe_key).unwrap();
            prop_assert!(verify_inclusion(&proof, root, probe_key).is_ok());
        } else {
            let proof = prove_exclusion(&t, probe_key).unwrap();
            prop_assert!(verify_exclusion(&proof, root, probe_key).is_ok());
        }
    }
}
