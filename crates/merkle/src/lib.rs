#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

mod boilerplate;
mod error;
mod mutate;
mod node;
mod proof;
mod validate;
mod verify;

pub use boilerplate::{child_digest, compress, compute_merkle_root};
pub use error::TreapError;
pub use mutate::{find, insert, merge, path, remove, split};
pub use node::{CompressedNode, Node, RegularNode};
pub use proof::{
    collect_keys, collect_keys_extended, compress_tree_for, join, join_proofs, prove_exclusion,
    prove_inclusion, KeyVisibility,
};
pub use validate::is_treap;
pub use verify::{verify_exclusion, verify_inclusion};
