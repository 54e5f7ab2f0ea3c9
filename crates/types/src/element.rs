use alloc::string::{String, ToString};

use crate::{Digest, Hasher, Key};

/// The element → key adapter (`spec.md` §6).
///
/// Elements are whatever the caller's application wants to accumulate; this library
/// never inspects them beyond their canonical textual form. Two elements that
/// encode to the same string are indistinguishable to the accumulator, so
/// implementations must pick an encoding that is injective over their domain.
pub trait Element {
    /// Returns the canonical textual encoding fed into the hash function.
    ///
    /// The reference encoding (`spec.md` §6) is the decimal form for integers and the
    /// natural form for strings; both sides of a proof must agree bit-exactly on
    /// whatever encoding is chosen, or Merkle roots will mismatch.
    fn canonical_string(&self) -> String;

    /// Derives this element's node key: `H(canonical_string(self))`.
    fn key<H: Hasher>(&self) -> Key {
        let digest: Digest = H::hash(self.canonical_string().as_bytes());
        Key::from_digest(&digest)
    }
}

macro_rules! impl_element_for_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                fn canonical_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_element_for_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Element for String {
    fn canonical_string(&self) -> String {
        self.clone()
    }
}

impl Element for str {
    fn canonical_string(&self) -> String {
        self.to_string()
    }
}

impl<T: Element + ?Sized> Element for &T {
    fn canonical_string(&self) -> String {
        (**self).canonical_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256Hasher;

    #[test]
    fn integers_use_decimal_form() {
        assert_eq!(1234u64.canonical_string(), "1234");
    }

    #[test]
    fn strings_use_natural_form() {
        assert_eq!("hello".canonical_string(), "hello");
    }

    #[test]
    fn key_derivation_is_deterministic_and_order_independent_of_call_site() {
        let a = 42u64.key::<Sha256Hasher>();
        let b = 42u64.key::<Sha256Hasher>();

        assert_eq!(a, b);
    }

    #[test]
    fn distinct_elements_give_distinct_keys_with_overwhelming_probability() {
        let a = 1u64.key::<Sha256Hasher>();
        let b = 2u64.key::<Sha256Hasher>();

        assert_ne!(a, b);
    }
}
