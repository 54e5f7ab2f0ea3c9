use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::marker::PhantomData;

use treap_accumulator_merkle::{
    collect_keys_extended, insert as node_insert, is_treap, remove as node_remove,
    verify_exclusion as node_verify_exclusion, verify_inclusion as node_verify_inclusion,
    KeyVisibility, Node, TreapError,
};
use treap_accumulator_types::{hash_none, Digest, Hasher, Key};

/// A set accumulator that holds only a Merkle root digest (`spec.md` §4.3).
///
/// Every mutation takes a proof tree claiming to correspond to the current
/// digest and replays the operation against it; the accumulator itself never
/// retains tree structure. `None` represents the digest of the empty set.
#[derive(Clone)]
pub struct Accumulator<H: Hasher> {
    digest: Option<Digest>,
    _hasher: PhantomData<H>,
}

impl<H: Hasher> Accumulator<H> {
    /// Builds an accumulator committed to `digest`.
    pub fn from_digest(digest: Digest) -> Self {
        Self {
            digest: Some(digest),
            _hasher: PhantomData,
        }
    }

    /// Builds an accumulator committed to the empty set.
    pub fn empty() -> Self {
        Self {
            digest: None,
            _hasher: PhantomData,
        }
    }

    /// The digest this accumulator is committed to, `None` for the empty set.
    pub fn digest(&self) -> Option<Digest> {
        self.digest
    }

    fn check_root(&self, proof: &Option<Node<H>>) -> Result<(), TreapError> {
        let actual = proof.as_ref().map(Node::recompute_merkle_root);

        if actual == self.digest {
            Ok(())
        } else {
            Err(TreapError::MerkleRootMismatch {
                expected: self.digest.unwrap_or_else(hash_none::<H>),
                actual: actual.unwrap_or_else(hash_none::<H>),
            })
        }
    }

    /// Inserts `key`, replaying the mutation against `proof` (`spec.md` §4.3).
    ///
    /// Fails with [`TreapError::MerkleRootMismatch`] if `proof` doesn't match
    /// this accumulator's digest, and with [`TreapError::TouchedCompressedNode`]
    /// if `proof` doesn't reveal enough of the tree to perform the insert.
    #[tracing::instrument(level = "debug", skip(self, proof))]
    pub fn insert(&mut self, key: Key, proof: Option<Node<H>>) -> Result<(), TreapError> {
        self.insert_many([key], proof)
    }

    /// Inserts every key in `keys` against a single supplied `proof`
    /// (`spec.md` §4.3), verifying the root only once up front.
    pub fn insert_many(
        &mut self,
        keys: impl IntoIterator<Item = Key>,
        proof: Option<Node<H>>,
    ) -> Result<(), TreapError> {
        self.check_root(&proof)?;

        let mut t = proof;
        for key in keys {
            t = node_insert(t, key)?;
        }

        self.digest = t.as_ref().map(Node::merkle_root);

        Ok(())
    }

    /// Removes `key`, replaying the mutation against `proof` (`spec.md` §4.3).
    #[tracing::instrument(level = "debug", skip(self, proof))]
    pub fn remove(&mut self, key: Key, proof: Option<Node<H>>) -> Result<(), TreapError> {
        self.remove_many([key], proof)
    }

    /// Removes every key in `keys` against a single supplied `proof`.
    pub fn remove_many(
        &mut self,
        keys: impl IntoIterator<Item = Key>,
        proof: Option<Node<H>>,
    ) -> Result<(), TreapError> {
        self.check_root(&proof)?;

        let mut t = proof;
        for key in keys {
            t = node_remove(t, key)?;
        }

        self.digest = t.as_ref().map(Node::merkle_root);

        Ok(())
    }

    /// Verifies `key` is in the accumulated set, given `proof`.
    pub fn verify_inclusion(&self, key: Key, proof: &Option<Node<H>>) -> Result<(), TreapError> {
        match self.digest {
            Some(root) => node_verify_inclusion(proof, root, key),
            None => Err(TreapError::KeyNotInTree(key)),
        }
    }

    /// Verifies `key` is not in the accumulated set, given `proof`.
    ///
    /// An empty accumulator excludes every key trivially, without needing a
    /// proof.
    pub fn verify_exclusion(&self, key: Key, proof: &Option<Node<H>>) -> Result<(), TreapError> {
        match self.digest {
            Some(root) => node_verify_exclusion(proof, root, key),
            None => Ok(()),
        }
    }

    /// Jumps directly from this accumulator's state to the state committed to
    /// by `new_proof`, without replaying individual mutations (`spec.md` §4.3,
    /// `treaccp/acc.py::Acc.warp`).
    ///
    /// `added` and `removed` describe, at the element-key level, which keys the
    /// new state gained and lost relative to the old one. Since there is only
    /// one valid treap shape for a given key set, `warp` validates the claim by
    /// checking the key-set algebra and [`is_treap`] on `new_proof` rather than
    /// replaying `insert`/`remove` one key at a time.
    ///
    /// Fails with [`TreapError::InvalidProof`] if the key-set algebra doesn't
    /// hold, if a `Compressed` node's committed root changed across the warp
    /// (which would let an attacker smuggle in a different hidden subtree), or
    /// if `new_proof` is not a valid treap.
    pub fn warp(
        &mut self,
        proof: Option<Node<H>>,
        added: &BTreeSet<Key>,
        removed: &BTreeSet<Key>,
        new_proof: Option<Node<H>>,
    ) -> Result<(), TreapError> {
        if !added.is_disjoint(removed) {
            return Err(TreapError::InvalidProof(
                "added and removed key sets are not disjoint",
            ));
        }

        self.check_root(&proof)?;

        let mut old_ext = Vec::new();
        collect_keys_extended(&proof, &mut old_ext);
        let mut new_ext = Vec::new();
        collect_keys_extended(&new_proof, &mut new_ext);

        let old_keys: BTreeSet<Key> = old_ext.iter().map(|(k, _)| *k).collect();
        let new_keys: BTreeSet<Key> = new_ext.iter().map(|(k, _)| *k).collect();

        let old_regular: BTreeSet<Key> = old_ext
            .iter()
            .filter(|(_, v)| matches!(v, KeyVisibility::Regular))
            .map(|(k, _)| *k)
            .collect();
        let new_regular: BTreeSet<Key> = new_ext
            .iter()
            .filter(|(_, v)| matches!(v, KeyVisibility::Regular))
            .map(|(k, _)| *k)
            .collect();

        let old_compressed: BTreeSet<(Key, Digest)> = old_ext
            .iter()
            .filter_map(|(k, v)| match v {
                KeyVisibility::Compressed(d) => Some((*k, *d)),
                KeyVisibility::Regular => None,
            })
            .collect();
        let new_compressed: BTreeSet<(Key, Digest)> = new_ext
            .iter()
            .filter_map(|(k, v)| match v {
                KeyVisibility::Compressed(d) => Some((*k, *d)),
                KeyVisibility::Regular => None,
            })
            .collect();

        if !removed.is_subset(&old_regular) {
            return Err(TreapError::InvalidProof(
                "removed keys are not all present and revealed in the old proof",
            ));
        }

        if !added.is_disjoint(&old_keys) {
            return Err(TreapError::InvalidProof(
                "added keys are already present in the old proof",
            ));
        }

        let new_regular_beyond_old: BTreeSet<Key> =
            new_regular.difference(&old_regular).copied().collect();

        if &new_regular_beyond_old != added {
            return Err(TreapError::InvalidProof(
                "new proof reveals a different set of newly-regular keys than `added`",
            ));
        }

        let expected_new_keys: BTreeSet<Key> = old_keys
            .union(added)
            .copied()
            .collect::<BTreeSet<Key>>()
            .difference(removed)
            .copied()
            .collect();

        if expected_new_keys != new_keys {
            return Err(TreapError::InvalidProof(
                "new key set does not equal old keys plus added minus removed",
            ));
        }

        if old_compressed != new_compressed {
            return Err(TreapError::InvalidProof(
                "a compressed node's committed merkle root changed across the warp",
            ));
        }

        is_treap(&new_proof)?;

        let claimed = new_proof.as_ref().map(Node::merkle_root);
        let recomputed = new_proof.as_ref().map(Node::recompute_merkle_root);

        if claimed != recomputed {
            return Err(TreapError::MerkleRootMismatch {
                expected: claimed.unwrap_or_else(hash_none::<H>),
                actual: recomputed.unwrap_or_else(hash_none::<H>),
            });
        }

        self.digest = claimed;

        Ok(())
    }
}
