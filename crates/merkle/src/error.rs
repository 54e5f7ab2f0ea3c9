use treap_accumulator_types::{Digest, Key};

/// The six error kinds raised by the node layer and the accumulator (`spec.md` §7).
///
/// No internal recovery is attempted anywhere in this crate; every fallible
/// operation surfaces one of these variants to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreapError {
    /// Operation expected the key but it is absent (`remove`, `remove_proof`,
    /// `prove_inclusion`).
    #[error("key {0} is not in the tree")]
    KeyNotInTree(Key),

    /// Operation expected the key to be absent (`insert`, `insert_proof`,
    /// `prove_exclusion`, exclusion verification).
    #[error("key {0} is already in the tree")]
    KeyInTree(Key),

    /// A supplied proof's recomputed root does not match the verifier's digest.
    #[error("merkle root mismatch: expected {expected}, got {actual}")]
    MerkleRootMismatch {
        /// The digest the verifier expected.
        expected: Digest,
        /// The digest recomputed from the supplied proof.
        actual: Digest,
    },

    /// A proof's shape does not support the claim being checked.
    #[error("invalid proof: {0}")]
    InvalidProof(&'static str),

    /// A mutating operation needed structure that the proof hid.
    #[error("search touched a compressed node")]
    TouchedCompressedNode,

    /// The accumulator was asked to convert from or act on an empty tree.
    #[error("tree has no root")]
    NoRoot,
}
