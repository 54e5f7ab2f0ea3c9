use alloc::vec::Vec;

use treap_accumulator_types::{Digest, Hasher, Key};

use crate::boilerplate::compress_opt;
use crate::mutate::path;
use crate::{Node, TreapError};

/// Builds a proof tree for `k`: the path from the root to `k` (or to the point
/// where the search fell off the tree) stays `Regular`; every sibling hanging
/// off that path is `compress`ed (`spec.md` §4.2, §4.3). The Merkle root is
/// unchanged by construction.
pub fn compress_tree_for<H: Hasher>(
    t: &Option<Node<H>>,
    k: Key,
) -> Result<Option<Node<H>>, TreapError> {
    let n = match t {
        None => return Ok(None),
        Some(n) => n,
    };

    let Node::Regular(r) = n else {
        return Err(TreapError::TouchedCompressedNode);
    };

    if k == r.key {
        Ok(Some(Node::regular(
            r.key,
            r.priority,
            compress_opt(&r.left),
            compress_opt(&r.right),
        )))
    } else if k < r.key {
        let left = compress_tree_for(&r.left, k)?;
        Ok(Some(Node::regular(
            r.key,
            r.priority,
            left,
            compress_opt(&r.right),
        )))
    } else {
        let right = compress_tree_for(&r.right, k)?;
        Ok(Some(Node::regular(
            r.key,
            r.priority,
            compress_opt(&r.left),
            right,
        )))
    }
}

/// Proves that `k` is in `t` (`spec.md` §4.3). Fails with
/// [`TreapError::KeyNotInTree`] if `k` is absent — an inclusion proof cannot be
/// built for a key that was never inserted.
pub fn prove_inclusion<H: Hasher>(
    t: &Option<Node<H>>,
    k: Key,
) -> Result<Option<Node<H>>, TreapError> {
    match path(t, k)?.last() {
        Some(n) if n.key() == k => compress_tree_for(t, k),
        _ => Err(TreapError::KeyNotInTree(k)),
    }
}

/// Proves that `k` is not in `t` (`spec.md` §4.3): an inclusion proof for the
/// last node actually visited while searching for `k` before the search fell
/// off the tree (the reference's `path[-2]`, since `path[-1]` is the `None` the
/// search bottomed out at).
///
/// Fails with [`TreapError::KeyInTree`] if `k` turns out to be present, and with
/// [`TreapError::NoRoot`] if `t` is empty (there is no node to build a proof
/// around).
pub fn prove_exclusion<H: Hasher>(
    t: &Option<Node<H>>,
    k: Key,
) -> Result<Option<Node<H>>, TreapError> {
    let visited = path(t, k)?;

    match visited.last() {
        Some(n) if n.key() == k => Err(TreapError::KeyInTree(k)),
        Some(n) => compress_tree_for(t, n.key()),
        None => Err(TreapError::NoRoot),
    }
}

/// The preference order used by [`join`] when two proofs disagree on how much
/// of a subtree to reveal at the same position: `Regular` is the most
/// informative, `Compressed` next, an absent node least.
fn rank<H: Hasher>(n: &Option<Node<H>>) -> u8 {
    match n {
        Some(n) if !n.is_compressed() => 0,
        Some(_) => 1,
        None => 2,
    }
}

fn root_or_none<H: Hasher>(n: &Option<Node<H>>) -> Digest {
    n.as_ref()
        .map(Node::merkle_root)
        .unwrap_or_else(treap_accumulator_types::hash_none::<H>)
}

/// Overlays two proof subtrees that commit to the same Merkle root, keeping
/// whichever side reveals more at each position and recursing only where both
/// sides are `Regular` (`spec.md` §4.4).
///
/// Fails with [`TreapError::MerkleRootMismatch`] if the two subtrees' roots
/// disagree — `join` only makes sense for proofs of the same tree.
pub fn join<H: Hasher>(
    a: Option<Node<H>>,
    b: Option<Node<H>>,
) -> Result<Option<Node<H>>, TreapError> {
    let (ra, rb) = (root_or_none::<H>(&a), root_or_none::<H>(&b));

    if ra != rb {
        return Err(TreapError::MerkleRootMismatch {
            expected: ra,
            actual: rb,
        });
    }

    match (rank(&a), rank(&b)) {
        (x, y) if x < y => Ok(a),
        (x, y) if y < x => Ok(b),
        (0, 0) => {
            let (Some(Node::Regular(na)), Some(Node::Regular(nb))) = (a, b) else {
                unreachable!("rank 0 on both sides implies both Regular")
            };

            let left = join(na.left.clone(), nb.left.clone())?;
            let right = join(na.right.clone(), nb.right.clone())?;

            Ok(Some(Node::regular(na.key, na.priority, left, right)))
        }
        // both Compressed, or both absent: roots already verified equal, and
        // neither side reveals more structure than the other, so either is fine.
        _ => Ok(a),
    }
}

/// Folds [`join`] left-to-right over a non-empty sequence of proofs
/// (`spec.md` §4.4's n-ary `join_proofs`).
///
/// Fails with [`TreapError::InvalidProof`] if `proofs` is empty.
pub fn join_proofs<H: Hasher>(
    proofs: Vec<Option<Node<H>>>,
) -> Result<Option<Node<H>>, TreapError> {
    let mut iter = proofs.into_iter();
    let first = iter
        .next()
        .ok_or(TreapError::InvalidProof("join_proofs requires at least one proof"))?;

    iter.try_fold(first, |acc, next| join(acc, next))
}

/// Collects every key visible in a proof tree, `Regular` or `Compressed`
/// (`spec.md` §4.5, used by inclusion verification).
pub fn collect_keys<H: Hasher>(t: &Option<Node<H>>, out: &mut Vec<Key>) {
    let Some(n) = t else {
        return;
    };

    out.push(n.key());

    if let Node::Regular(r) = n {
        collect_keys(&r.left, out);
        collect_keys(&r.right, out);
    }
}

/// How a key is revealed at a position in a proof tree: fully (`Regular`, with
/// structure underneath still to walk) or only as a commitment (`Compressed`,
/// carrying the Merkle root that position is pinned to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyVisibility {
    /// The node at this key is `Regular`.
    Regular,
    /// The node at this key is `Compressed`, committed to this Merkle root.
    Compressed(Digest),
}

/// Like [`collect_keys`] but also records, for every key, whether it was seen
/// through a `Regular` or `Compressed` node (`spec.md` §4.6, used by `warp`).
pub fn collect_keys_extended<H: Hasher>(t: &Option<Node<H>>, out: &mut Vec<(Key, KeyVisibility)>) {
    let Some(n) = t else {
        return;
    };

    match n {
        Node::Regular(r) => {
            out.push((r.key, KeyVisibility::Regular));
            collect_keys_extended(&r.left, out);
            collect_keys_extended(&r.right, out);
        }
        Node::Compressed(c) => {
            out.push((c.key, KeyVisibility::Compressed(c.merkle_root)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutate::insert;
    use treap_accumulator_types::Sha256Hasher;

    fn key(b: &[u8]) -> Key {
        Key::from_digest(&Sha256Hasher::hash(b))
    }

    fn build(keys: &[&[u8]]) -> Option<Node<Sha256Hasher>> {
        let mut t = None;
        for k in keys {
            t = insert(t, key(k)).unwrap();
        }
        t
    }

    #[test]
    fn inclusion_proof_preserves_root_and_reveals_key() {
        let t = build(&[b"a", b"b", b"c", b"d"]);
        let proof = prove_inclusion(&t, key(b"b")).unwrap();

        assert_eq!(
            t.as_ref().map(Node::merkle_root),
            proof.as_ref().map(Node::merkle_root)
        );

        let mut keys = Vec::new();
        collect_keys(&proof, &mut keys);
        assert!(keys.contains(&key(b"b")));
    }

    #[test]
    fn inclusion_proof_for_missing_key_fails() {
        let t = build(&[b"a"]);

        assert_eq!(
            prove_inclusion(&t, key(b"z")).unwrap_err(),
            TreapError::KeyNotInTree(key(b"z"))
        );
    }

    #[test]
    fn exclusion_proof_on_empty_tree_fails() {
        let t: Option<Node<Sha256Hasher>> = None;

        assert_eq!(
            prove_exclusion(&t, key(b"a")).unwrap_err(),
            TreapError::NoRoot
        );
    }

    #[test]
    fn join_of_identical_proofs_preserves_root() {
        let t = build(&[b"a", b"b", b"c"]);
        let p1 = prove_inclusion(&t, key(b"a")).unwrap();
        let p2 = prove_inclusion(&t, key(b"b")).unwrap();

        let joined = join(p1, p2).unwrap();

        assert_eq!(
            t.as_ref().map(Node::merkle_root),
            joined.as_ref().map(Node::merkle_root)
        );

        let mut keys = Vec::new();
        collect_keys(&joined, &mut keys);
        assert!(keys.contains(&key(b"a")));
        assert!(keys.contains(&key(b"b")));
    }
}
