use alloc::sync::Arc;
use core::fmt;
use core::marker::PhantomData;

use treap_accumulator_types::{Digest, Hasher, Key, Priority};

/// A node whose full subtree is known.
///
/// `spec.md` §3: carries `key`, `priority`, both optional children, and the
/// Merkle root recomputed from them.
pub struct RegularNode<H: Hasher> {
    pub(crate) key: Key,
    pub(crate) priority: Priority,
    pub(crate) left: Option<Node<H>>,
    pub(crate) right: Option<Node<H>>,
    pub(crate) merkle_root: Digest,
    pub(crate) _hasher: PhantomData<H>,
}

/// A node that hides its subtree, retaining only the children's Merkle roots.
///
/// `spec.md` §3: carries `key`, `priority`, and the two child digests (`HASH_NONE`
/// for an absent child). Produced by [`crate::compress`].
pub struct CompressedNode {
    pub(crate) key: Key,
    pub(crate) priority: Priority,
    pub(crate) left_digest: Digest,
    pub(crate) right_digest: Digest,
    pub(crate) merkle_root: Digest,
}

/// A treap node: either [`RegularNode`] (full information) or [`CompressedNode`]
/// (a commitment that hides a subtree).
///
/// `None` (i.e. `Option<Node<H>>`) represents an absent child uniformly; its
/// contribution to a parent's Merkle root is the `HASH_NONE` sentinel.
pub enum Node<H: Hasher> {
    /// Full information at this position.
    Regular(Arc<RegularNode<H>>),
    /// A hidden subtree, committed to but not revealed.
    Compressed(Arc<CompressedNode>),
}

impl<H: Hasher> Node<H> {
    /// This node's key.
    pub fn key(&self) -> Key {
        match self {
            Node::Regular(n) => n.key,
            Node::Compressed(n) => n.key,
        }
    }

    /// This node's priority.
    pub fn priority(&self) -> Priority {
        match self {
            Node::Regular(n) => n.priority,
            Node::Compressed(n) => n.priority,
        }
    }

    /// This node's Merkle root, as stored (not recomputed).
    pub fn merkle_root(&self) -> Digest {
        match self {
            Node::Regular(n) => n.merkle_root,
            Node::Compressed(n) => n.merkle_root,
        }
    }

    /// Returns `true` if this node hides its subtree.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Node::Compressed(_))
    }

    /// The `Regular` node's left child, if this is a `Regular` node with one.
    pub fn left(&self) -> Option<&Node<H>> {
        match self {
            Node::Regular(n) => n.left.as_ref(),
            Node::Compressed(_) => None,
        }
    }

    /// The `Regular` node's right child, if this is a `Regular` node with one.
    pub fn right(&self) -> Option<&Node<H>> {
        match self {
            Node::Regular(n) => n.right.as_ref(),
            Node::Compressed(_) => None,
        }
    }
}

impl<H: Hasher> Clone for Node<H> {
    fn clone(&self) -> Self {
        match self {
            Node::Regular(n) => Node::Regular(n.clone()),
            Node::Compressed(n) => Node::Compressed(n.clone()),
        }
    }
}

impl<H: Hasher> fmt::Debug for Node<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Regular(n) => f
                .debug_struct("Regular")
                .field("key", &n.key)
                .field("priority", &n.priority)
                .field("merkle_root", &n.merkle_root)
                .field("left", &n.left)
                .field("right", &n.right)
                .finish(),
            Node::Compressed(n) => f
                .debug_struct("Compressed")
                .field("key", &n.key)
                .field("priority", &n.priority)
                .field("merkle_root", &n.merkle_root)
                .finish(),
        }
    }
}
