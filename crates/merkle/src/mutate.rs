use alloc::vec::Vec;

use treap_accumulator_types::{Hasher, Key};

use crate::{Node, TreapError};

/// Splits `t` into the subtree of keys `< k` and the subtree of keys `> k` (or,
/// when `equal_left` is set, `<= k`), mirroring the Python reference's
/// `split(t, k, equal_left)` (`spec.md` §5).
///
/// Fails with [`TreapError::TouchedCompressedNode`] if reaching a decision
/// requires descending into a `Compressed` node — a proof that doesn't reveal
/// enough of the tree cannot support a split at this key.
pub fn split<H: Hasher>(
    t: Option<Node<H>>,
    k: Key,
    equal_left: bool,
) -> Result<(Option<Node<H>>, Option<Node<H>>), TreapError> {
    let t = match t {
        None => return Ok((None, None)),
        Some(t) => t,
    };

    let Node::Regular(r) = &t else {
        return Err(TreapError::TouchedCompressedNode);
    };

    let go_left = r.key < k || (equal_left && r.key == k);

    if go_left {
        let (l, r2) = split(r.right.clone(), k, equal_left)?;
        let left = Node::regular(r.key, r.priority, r.left.clone(), l);

        Ok((Some(left), r2))
    } else {
        let (l2, r2) = split(r.left.clone(), k, equal_left)?;
        let right = Node::regular(r.key, r.priority, r2, r.right.clone());

        Ok((l2, Some(right)))
    }
}

/// Merges two treaps `t1` and `t2` into one, assuming every key in `t1` is less
/// than every key in `t2` (`spec.md` §5). The result's shape is determined
/// entirely by the priorities: the node with the higher priority becomes the
/// root, recursively.
///
/// The Python reference checks for a compressed node unconditionally, before
/// checking for absence — matching that order here so a `Compressed` node
/// adjacent to an empty side still raises `TouchedCompressedNode` rather than
/// silently returning the other side.
pub fn merge<H: Hasher>(
    t1: Option<Node<H>>,
    t2: Option<Node<H>>,
) -> Result<Option<Node<H>>, TreapError> {
    if let Some(n) = &t1 {
        if n.is_compressed() {
            return Err(TreapError::TouchedCompressedNode);
        }
    }

    if let Some(n) = &t2 {
        if n.is_compressed() {
            return Err(TreapError::TouchedCompressedNode);
        }
    }

    match (t1, t2) {
        (None, t2) => Ok(t2),
        (t1, None) => Ok(t1),
        (Some(t1), Some(t2)) => {
            let Node::Regular(r1) = &t1 else {
                unreachable!("compressed checked above")
            };
            let Node::Regular(r2) = &t2 else {
                unreachable!("compressed checked above")
            };

            if r1.priority > r2.priority {
                let merged = merge(r1.right.clone(), Some(t2))?;
                Ok(Some(Node::regular(r1.key, r1.priority, r1.left.clone(), merged)))
            } else {
                let merged = merge(Some(t1), r2.left.clone())?;
                Ok(Some(Node::regular(r2.key, r2.priority, merged, r2.right.clone())))
            }
        }
    }
}

/// Returns the node for `k` in `t`, or `None` if `k` is absent.
///
/// Fails with [`TreapError::TouchedCompressedNode`] if the search must descend
/// into a `Compressed` node to reach a verdict.
pub fn find<H: Hasher>(t: &Option<Node<H>>, k: Key) -> Result<Option<Node<H>>, TreapError> {
    let n = match t {
        None => return Ok(None),
        Some(n) => n,
    };

    let Node::Regular(r) = n else {
        return Err(TreapError::TouchedCompressedNode);
    };

    if k == r.key {
        Ok(Some(n.clone()))
    } else if k < r.key {
        find(&r.left, k)
    } else {
        find(&r.right, k)
    }
}

/// Returns the sequence of nodes visited while searching for `k` in `t`, root
/// first, ending either at the node with key `k` or at the last node visited
/// before the search fell off the tree.
///
/// Used by [`crate::prove_exclusion`], which needs the last node actually
/// touched (`path[path.len() - 2]` in the reference's zero-indexed terms, i.e.
/// the second-to-last entry here since the final entry is the synthetic `None`
/// the search bottomed out at — callers that only care about the touched nodes
/// should drop a trailing `None` sentinel; this function does not push one).
///
/// Fails with [`TreapError::TouchedCompressedNode`] under the same condition as
/// [`find`].
pub fn path<H: Hasher>(t: &Option<Node<H>>, k: Key) -> Result<Vec<Node<H>>, TreapError> {
    let mut out = Vec::new();
    let mut cur = t.clone();

    loop {
        let n = match cur {
            None => break,
            Some(n) => n,
        };

        let Node::Regular(r) = &n else {
            return Err(TreapError::TouchedCompressedNode);
        };

        out.push(n.clone());

        if k == r.key {
            break;
        } else if k < r.key {
            cur = r.left.clone();
        } else {
            cur = r.right.clone();
        }
    }

    Ok(out)
}

/// Inserts `k` into `t`, failing with [`TreapError::KeyInTree`] if it is
/// already present (`spec.md` §5). Implemented as `split` then `merge` through a
/// fresh leaf, as in the reference.
pub fn insert<H: Hasher>(t: Option<Node<H>>, k: Key) -> Result<Option<Node<H>>, TreapError> {
    if find(&t, k)?.is_some() {
        return Err(TreapError::KeyInTree(k));
    }

    let (l, r) = split(t, k, false)?;
    let leaf = Node::leaf(k);
    let merged = merge(l, Some(leaf))?;

    merge(merged, r)
}

/// Removes `k` from `t`, failing with [`TreapError::KeyNotInTree`] if it is
/// absent (`spec.md` §5). Implemented as two splits discarding the singleton
/// middle part, then a merge of what remains, as in the reference.
pub fn remove<H: Hasher>(t: Option<Node<H>>, k: Key) -> Result<Option<Node<H>>, TreapError> {
    if find(&t, k)?.is_none() {
        return Err(TreapError::KeyNotInTree(k));
    }

    let (l, mid) = split(t, k, false)?;
    let (_, r) = split(mid, k, true)?;

    merge(l, r)
}
