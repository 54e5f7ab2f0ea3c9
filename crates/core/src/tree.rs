use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use treap_accumulator_merkle::{
    find as node_find, insert as node_insert, join, join_proofs, prove_exclusion,
    prove_inclusion, remove as node_remove, verify_exclusion as node_verify_exclusion,
    verify_inclusion as node_verify_inclusion, Node, TreapError,
};
use treap_accumulator_types::{Digest, Element, Hasher};

use crate::Accumulator;

/// A persistent, element-typed Merkle treap (`spec.md` §4.4,
/// `treaccp/tree.py::Treaccp`).
///
/// Binds a caller's element type `E` to the node layer by deriving each
/// element's key through [`Element::key`]. Alongside the treap root it keeps a
/// shadow set of elements purely to answer [`Tree::is_member`] in terms of the
/// caller's own type rather than a key; the shadow set is never hashed into
/// any digest.
#[derive(Clone)]
pub struct Tree<E, H: Hasher> {
    root: Option<Node<H>>,
    elements: BTreeSet<E>,
}

impl<E, H: Hasher> Tree<E, H>
where
    E: Element + Ord + Clone,
{
    /// Builds a tree from a set of elements in one pass, without producing a
    /// proof (`treaccp/nodes.py::build_treap`).
    pub fn build(elements: impl IntoIterator<Item = E>) -> Result<Self, TreapError> {
        let mut root = None;
        let mut set = BTreeSet::new();

        for el in elements {
            root = node_insert(root, el.key::<H>())?;
            set.insert(el);
        }

        Ok(Self {
            root,
            elements: set,
        })
    }

    /// An empty tree.
    pub fn empty() -> Self {
        Self {
            root: None,
            elements: BTreeSet::new(),
        }
    }

    /// The tree's Merkle root, `None` if empty.
    pub fn merkle_root(&self) -> Option<Digest> {
        self.root.as_ref().map(Node::merkle_root)
    }

    /// Converts this tree to an [`Accumulator`] holding only its digest.
    ///
    /// Fails with [`TreapError::NoRoot`] on an empty tree — there is no
    /// non-trivial commitment to hand to a caller that only wants the digest.
    pub fn to_acc(&self) -> Result<Accumulator<H>, TreapError> {
        self.root
            .as_ref()
            .map(|n| Accumulator::from_digest(n.merkle_root()))
            .ok_or(TreapError::NoRoot)
    }

    /// Returns the node for `el`, if present.
    pub fn find(&self, el: &E) -> Result<Option<Node<H>>, TreapError> {
        node_find(&self.root, el.key::<H>())
    }

    /// Returns `true` if `el` was inserted into this tree and not since
    /// removed. Answered from the element shadow set, independent of the
    /// Merkle tree traversal.
    pub fn is_member(&self, el: &E) -> bool {
        self.elements.contains(el)
    }

    /// Builds an inclusion proof for `el` (`spec.md` §4.3).
    pub fn prove_inclusion(&self, el: &E) -> Result<Option<Node<H>>, TreapError> {
        prove_inclusion(&self.root, el.key::<H>())
    }

    /// Builds an exclusion proof for `el` (`spec.md` §4.3).
    pub fn prove_exclusion(&self, el: &E) -> Result<Option<Node<H>>, TreapError> {
        prove_exclusion(&self.root, el.key::<H>())
    }

    /// Verifies `proof` shows `el` is in this tree.
    pub fn verify_inclusion(&self, el: &E, proof: &Option<Node<H>>) -> Result<(), TreapError> {
        let root = self.root.as_ref().map(Node::merkle_root).ok_or(TreapError::NoRoot)?;
        node_verify_inclusion(proof, root, el.key::<H>())
    }

    /// Verifies `proof` shows `el` is not in this tree.
    ///
    /// An empty tree excludes every element trivially.
    pub fn verify_exclusion(&self, el: &E, proof: &Option<Node<H>>) -> Result<(), TreapError> {
        match self.root.as_ref().map(Node::merkle_root) {
            Some(root) => node_verify_exclusion(proof, root, el.key::<H>()),
            None => Ok(()),
        }
    }

    /// The minimal proof that supports inserting `el` into this tree: an
    /// exclusion proof of `el`'s own key (`spec.md` §9; see `SPEC_FULL.md` §4
    /// for why this diverges from the reference's successor-based formula).
    pub fn insert_proof(&self, el: &E) -> Result<Option<Node<H>>, TreapError> {
        prove_exclusion(&self.root, el.key::<H>())
    }

    /// The proof that supports removing `el` from this tree: the join of
    /// exclusion proofs for `el`'s key's two neighbours, since the removed
    /// node may rotate down through either side during `merge`
    /// (`treaccp/nodes.py::remove_proof`).
    pub fn remove_proof(&self, el: &E) -> Result<Option<Node<H>>, TreapError> {
        let key = el.key::<H>();

        if node_find(&self.root, key)?.is_none() {
            return Err(TreapError::KeyNotInTree(key));
        }

        let above = prove_exclusion(&self.root, key.succ())?;
        let below = prove_exclusion(&self.root, key.pred())?;

        join(above, below)
    }

    /// Inserts `el`, returning the new tree and a proof that supports
    /// replaying the insertion against an [`Accumulator`] at the old digest.
    pub fn insert(&self, el: E) -> Result<(Self, Option<Node<H>>), TreapError> {
        self.insert_many([el])
    }

    /// Inserts every element in `els` with a single joined proof covering all
    /// of them (`spec.md` §4.4).
    pub fn insert_many(
        &self,
        els: impl IntoIterator<Item = E>,
    ) -> Result<(Self, Option<Node<H>>), TreapError> {
        let els: Vec<E> = els.into_iter().collect();

        let mut proofs = Vec::with_capacity(els.len());
        for el in &els {
            proofs.push(self.insert_proof(el)?);
        }
        let proof = join_proofs(proofs)?;

        let mut root = self.root.clone();
        let mut elements = self.elements.clone();

        for el in &els {
            root = node_insert(root, el.key::<H>())?;
            elements.insert(el.clone());
        }

        Ok((
            Self {
                root,
                elements,
            },
            proof,
        ))
    }

    /// Removes `el`, returning the new tree and a proof that supports
    /// replaying the removal against an [`Accumulator`] at the old digest.
    pub fn remove(&self, el: E) -> Result<(Self, Option<Node<H>>), TreapError> {
        self.remove_many([el])
    }

    /// Removes every element in `els` with a single joined proof covering all
    /// of them.
    pub fn remove_many(
        &self,
        els: impl IntoIterator<Item = E>,
    ) -> Result<(Self, Option<Node<H>>), TreapError> {
        let els: Vec<E> = els.into_iter().collect();

        let mut proofs = Vec::with_capacity(els.len());
        for el in &els {
            proofs.push(self.remove_proof(el)?);
        }
        let proof = join_proofs(proofs)?;

        let mut root = self.root.clone();
        let mut elements = self.elements.clone();

        for el in &els {
            root = node_remove(root, el.key::<H>())?;
            elements.remove(el);
        }

        Ok((
            Self {
                root,
                elements,
            },
            proof,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treap_accumulator_types::Sha256Hasher;

    type StrTree = Tree<alloc::string::String, Sha256Hasher>;

    fn s(v: &str) -> alloc::string::String {
        alloc::string::String::from(v)
    }

    #[test]
    fn build_then_is_member() {
        let t = StrTree::build([s("a"), s("b"), s("c")]).unwrap();

        assert!(t.is_member(&s("a")));
        assert!(!t.is_member(&s("z")));
    }

    #[test]
    fn insert_then_remove_restores_membership() {
        let t = StrTree::build([s("a"), s("b")]).unwrap();
        let (t2, proof) = t.insert(s("c")).unwrap();

        assert!(proof.is_some() || t2.merkle_root().is_some());
        assert!(t2.is_member(&s("c")));

        let (t3, _) = t2.remove(s("c")).unwrap();
        assert!(!t3.is_member(&s("c")));
        assert_eq!(t3.merkle_root(), t.merkle_root());
    }

    #[test]
    fn insert_proof_supports_accumulator_replay() {
        let t = StrTree::build([s("a"), s("b")]).unwrap();
        let acc_root = t.merkle_root().unwrap();
        let mut acc = Accumulator::<Sha256Hasher>::from_digest(acc_root);

        let proof = t.insert_proof(&s("c")).unwrap();
        let (t2, _) = t.insert(s("c")).unwrap();

        acc.insert(s("c").key::<Sha256Hasher>(), proof).unwrap();

        assert_eq!(acc.digest(), t2.merkle_root());
    }

    #[test]
    fn remove_proof_supports_accumulator_replay() {
        let t = StrTree::build([s("a"), s("b"), s("c")]).unwrap();
        let acc_root = t.merkle_root().unwrap();
        let mut acc = Accumulator::<Sha256Hasher>::from_digest(acc_root);

        let proof = t.remove_proof(&s("b")).unwrap();
        let (t2, _) = t.remove(s("b")).unwrap();

        acc.remove(s("b").key::<Sha256Hasher>(), proof).unwrap();

        assert_eq!(acc.digest(), t2.merkle_root());
    }

    #[test]
    fn verify_inclusion_and_exclusion_round_trip() {
        let t = StrTree::build([s("a"), s("b"), s("c")]).unwrap();

        let incl = t.prove_inclusion(&s("b")).unwrap();
        assert!(t.verify_inclusion(&s("b"), &incl).is_ok());

        let excl = t.prove_exclusion(&s("z")).unwrap();
        assert!(t.verify_exclusion(&s("z"), &excl).is_ok());
    }

    #[test]
    fn to_acc_fails_on_empty_tree() {
        let t = StrTree::empty();

        assert_eq!(t.to_acc().unwrap_err(), TreapError::NoRoot);
    }
}
