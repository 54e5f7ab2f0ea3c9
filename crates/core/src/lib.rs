#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

mod accumulator;
mod tree;

pub use accumulator::Accumulator;
pub use tree::Tree;

pub use treap_accumulator_merkle::{Node, TreapError};
pub use treap_accumulator_types::{Digest, Element, Hasher, Key, Priority, Sha256Hasher};
