#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

mod crypto;
mod element;
mod scalar;

pub use crypto::*;
pub use element::*;
pub use scalar::*;
