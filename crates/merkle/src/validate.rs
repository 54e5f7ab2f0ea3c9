use treap_accumulator_types::Hasher;

use crate::{Node, TreapError};

/// Validates that `t` is a treap: binary-search-tree order on keys and
/// max-heap order on priorities (`spec.md` §4.2's structural invariant).
///
/// A `Compressed` node is treated as a leaf: its key and priority are checked
/// against its parent like any other node's, but there is no structure
/// beneath it to descend into, so validation stops there rather than failing.
/// This is what lets a `warp` target still carry compressed perimeter nodes
/// and pass validation. Fails with [`TreapError::InvalidProof`] naming which
/// property broke.
pub fn is_treap<H: Hasher>(t: &Option<Node<H>>) -> Result<(), TreapError> {
    verify_bst(t, None, None)?;
    verify_heap(t)?;

    Ok(())
}

fn verify_bst<H: Hasher>(
    t: &Option<Node<H>>,
    lo: Option<treap_accumulator_types::Key>,
    hi: Option<treap_accumulator_types::Key>,
) -> Result<(), TreapError> {
    let Some(n) = t else {
        return Ok(());
    };

    let key = n.key();
    if lo.is_some_and(|lo| key <= lo) || hi.is_some_and(|hi| key >= hi) {
        return Err(TreapError::InvalidProof("not a binary tree"));
    }

    // a Compressed node's key is still checked against its bounds above, but
    // there is no structure underneath it to recurse into.
    let Node::Regular(r) = n else {
        return Ok(());
    };

    verify_bst(&r.left, lo, Some(r.key))?;
    verify_bst(&r.right, Some(r.key), hi)
}

fn verify_heap<H: Hasher>(t: &Option<Node<H>>) -> Result<(), TreapError> {
    let Some(n) = t else {
        return Ok(());
    };

    // a Compressed node is a leaf for heap purposes: its priority is checked
    // against its parent by the caller, and there is nothing beneath it.
    let Node::Regular(r) = n else {
        return Ok(());
    };

    for child in [&r.left, &r.right] {
        if let Some(c) = child {
            if c.priority() > r.priority {
                return Err(TreapError::InvalidProof("not a heap"));
            }
        }
    }

    verify_heap(&r.left)?;
    verify_heap(&r.right)
}
