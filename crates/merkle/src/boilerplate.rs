use alloc::string::String;
use alloc::sync::Arc;
use core::marker::PhantomData;

use treap_accumulator_types::{hash_none, Digest, Hasher, Key, Priority};

use crate::{CompressedNode, Node, RegularNode};

/// Returns the Merkle root contribution of a possibly-absent child: the child's
/// own root if present, else the `HASH_NONE` sentinel (`spec.md` §3).
pub fn child_digest<H: Hasher>(child: &Option<Node<H>>) -> Digest {
    match child {
        Some(n) => n.merkle_root(),
        None => hash_none::<H>(),
    }
}

/// Computes a node's Merkle root from its fields and its children's digests.
///
/// `spec.md` §6: the hash input is the concatenation, in order, of the decimal
/// textual form of `key`, the decimal textual form of `priority`, the 64-char hex
/// of the left digest, and the 64-char hex of the right digest.
pub fn compute_merkle_root<H: Hasher>(
    key: Key,
    priority: Priority,
    left: Digest,
    right: Digest,
) -> Digest {
    let mut input = String::with_capacity(256);

    input.push_str(&key.to_decimal());
    input.push_str(&priority.to_decimal());
    input.push_str(&left.to_hex());
    input.push_str(&right.to_hex());

    H::hash(input.as_bytes())
}

impl<H: Hasher> Node<H> {
    /// Builds a `Regular` node from its fields, computing the Merkle root from the
    /// children's own roots (one hash, not a recursive re-derivation — each child
    /// already carries its correct root).
    pub fn regular(
        key: Key,
        priority: Priority,
        left: Option<Node<H>>,
        right: Option<Node<H>>,
    ) -> Node<H> {
        let merkle_root =
            compute_merkle_root::<H>(key, priority, child_digest(&left), child_digest(&right));

        Node::Regular(Arc::new(RegularNode {
            key,
            priority,
            left,
            right,
            merkle_root,
            _hasher: PhantomData,
        }))
    }

    /// Builds a fresh, childless `Regular` node for `key`, deriving its priority.
    pub fn leaf(key: Key) -> Node<H> {
        let priority = key.derive_priority::<H>();
        Self::regular(key, priority, None, None)
    }

    /// Recomputes the Merkle root of the whole subtree rooted at `self` from
    /// scratch, descending through `Regular` nodes and trusting a `Compressed`
    /// node's stored root as-is (there is nothing underneath to recompute from).
    ///
    /// Proof verification calls this to confirm the fields of every `Regular`
    /// node in the proof (key, priority, and which children are present) are
    /// consistent with the digest they claim.
    pub fn recompute_merkle_root(&self) -> Digest {
        match self {
            Node::Compressed(n) => n.merkle_root,
            Node::Regular(n) => {
                let left = n
                    .left
                    .as_ref()
                    .map_or_else(hash_none::<H>, |c| c.recompute_merkle_root());
                let right = n
                    .right
                    .as_ref()
                    .map_or_else(hash_none::<H>, |c| c.recompute_merkle_root());

                compute_merkle_root::<H>(n.key, n.priority, left, right)
            }
        }
    }
}

impl CompressedNode {
    /// Builds a compressed node directly from its committed fields.
    pub fn new<H: Hasher>(
        key: Key,
        priority: Priority,
        left_digest: Digest,
        right_digest: Digest,
    ) -> CompressedNode {
        let merkle_root = compute_merkle_root::<H>(key, priority, left_digest, right_digest);

        CompressedNode {
            key,
            priority,
            left_digest,
            right_digest,
            merkle_root,
        }
    }
}

/// Hides a `Regular` node's subtree, retaining only its children's digests.
///
/// `spec.md` §4.2: the resulting node's Merkle root equals the input's by
/// construction — both are `H(key ‖ priority ‖ left_digest ‖ right_digest)` over
/// the same child digests.
pub fn compress<H: Hasher>(n: &Node<H>) -> Node<H> {
    match n {
        Node::Compressed(_) => n.clone(),
        Node::Regular(r) => Node::Compressed(Arc::new(CompressedNode {
            key: r.key,
            priority: r.priority,
            left_digest: child_digest(&r.left),
            right_digest: child_digest(&r.right),
            merkle_root: r.merkle_root,
        })),
    }
}

pub(crate) fn compress_opt<H: Hasher>(n: &Option<Node<H>>) -> Option<Node<H>> {
    n.as_ref().map(compress)
}
