use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::{Digest, Hasher};

/// A 256-bit unsigned integer, the integer interpretation of a [`Digest`].
///
/// `spec.md` §9 requires big-integer comparisons over the *full* 256 bits, never a
/// truncated prefix, or the treap-uniqueness property can be broken by an adversary
/// who finds a collision in a shorter prefix. [`U256`] is backed by four `u64` limbs
/// compared most-significant-limb first, which is exactly the big-endian numeric
/// comparison the invariant requires.
macro_rules! scalar_256 {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name(pub U256);

        impl $name {
            /// Interprets a digest's bytes as a big-endian 256-bit integer.
            pub fn from_digest(digest: &Digest) -> Self {
                Self(U256::from_big_endian(digest.as_bytes()))
            }

            /// Returns the canonical decimal string form used as Merkle-root hash input.
            pub fn to_decimal(self) -> alloc::string::String {
                alloc::format!("{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

scalar_256!(
    Key,
    "A node's key: `key(element) = int(H(stringify(element)), 16)` (`spec.md` §3, §6)."
);
scalar_256!(
    Priority,
    "A node's priority: `priority(key) = int(H(str(key)), 16)` (`spec.md` §3, §6)."
);

impl Key {
    /// Returns `key + 1`, saturating at `U256::MAX`.
    ///
    /// Used by `remove_proof`, which proves exclusion of both neighbors of a
    /// removed key (`spec.md` §9).
    pub fn succ(self) -> Self {
        Self(self.0.saturating_add(U256::one()))
    }

    /// Returns `key - 1`, saturating at zero.
    ///
    /// Used by `remove_proof`, which additionally proves exclusion of `key - 1`.
    pub fn pred(self) -> Self {
        Self(self.0.saturating_sub(U256::one()))
    }

    /// Derives the priority associated with this key: `H(str(key))`.
    pub fn derive_priority<H: Hasher>(self) -> Priority {
        let digest = H::hash(self.to_decimal().as_bytes());
        Priority::from_digest(&digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256Hasher;

    #[test]
    fn ordering_is_numeric_not_lexicographic_on_bytes_alone() {
        // Sanity check: U256 compares the full width, not a byte prefix.
        let a = Key(U256::from(1u64));
        let b = Key(U256::from(2u64));

        assert!(a < b);
    }

    #[test]
    fn succ_pred_round_trip() {
        let k = Key(U256::from(42u64));

        assert_eq!(k.succ().pred(), k);
    }

    #[test]
    fn priority_is_deterministic() {
        let k = Key(U256::from(7u64));

        assert_eq!(
            k.derive_priority::<Sha256Hasher>(),
            k.derive_priority::<Sha256Hasher>()
        );
    }
}
