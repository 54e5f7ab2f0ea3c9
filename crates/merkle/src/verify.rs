use alloc::vec::Vec;

use treap_accumulator_types::{Digest, Hasher, Key};

use crate::proof::collect_keys;
use crate::{Node, TreapError};

/// Verifies that `proof` is a valid inclusion proof of `k` against `root`
/// (`spec.md` §4.5): the proof's recomputed Merkle root must match `root`, and
/// `k` must appear among the keys the proof reveals — `Regular` or
/// `Compressed`, since a `Compressed` node's key is still committed to.
pub fn verify_inclusion<H: Hasher>(
    proof: &Option<Node<H>>,
    root: Digest,
    k: Key,
) -> Result<(), TreapError> {
    check_root::<H>(proof, root)?;

    let mut keys = Vec::new();
    collect_keys(proof, &mut keys);

    if keys.contains(&k) {
        Ok(())
    } else {
        Err(TreapError::InvalidProof(
            "inclusion proof does not reveal the claimed key",
        ))
    }
}

/// Verifies that `proof` is a valid exclusion proof of `k` against `root`
/// (`spec.md` §4.5): the proof's recomputed root must match `root`, and
/// searching the proof for `k` must fall off the revealed structure without
/// ever descending into a `Compressed` node and without ever finding `k`.
///
/// Touching a `Compressed` node during that search means the proof didn't
/// reveal enough to settle the question, which is itself evidence the proof is
/// invalid for this claim — surfaced as [`TreapError::InvalidProof`] rather
/// than [`TreapError::TouchedCompressedNode`], matching the distinction the
/// reference draws between a structural dead end during mutation and a
/// verification failure.
pub fn verify_exclusion<H: Hasher>(
    proof: &Option<Node<H>>,
    root: Digest,
    k: Key,
) -> Result<(), TreapError> {
    check_root::<H>(proof, root)?;

    match crate::mutate::find(proof, k) {
        Ok(None) => Ok(()),
        Ok(Some(_)) => Err(TreapError::KeyInTree(k)),
        Err(TreapError::TouchedCompressedNode) => Err(TreapError::InvalidProof(
            "exclusion proof does not reveal enough of the tree to settle the search",
        )),
        Err(e) => Err(e),
    }
}

fn check_root<H: Hasher>(proof: &Option<Node<H>>, root: Digest) -> Result<(), TreapError> {
    let actual = proof
        .as_ref()
        .map(Node::recompute_merkle_root)
        .unwrap_or_else(treap_accumulator_types::hash_none::<H>);

    if actual == root {
        Ok(())
    } else {
        Err(TreapError::MerkleRootMismatch {
            expected: root,
            actual,
        })
    }
}
