use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The hash output byte-length used by every digest in the accumulator.
pub const HASH_LEN: usize = 32;

/// A 256-bit cryptographic digest, displayed and parsed as 64 lowercase hex characters.
///
/// Every hashed value in the accumulator (keys, priorities, Merkle roots, the
/// `HASH_NONE` sentinel) is this type, matching the reference's "everything is a hex
/// string" encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "serde_digest")] pub [u8; HASH_LEN]);

impl Digest {
    /// Wraps a raw 32-byte array.
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the digest.
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Returns the lowercase, 64-character hex encoding used as the textual form of this
    /// digest everywhere it is fed back into the hash function (child digests in a node's
    /// Merkle-root input, for instance).
    pub fn to_hex(&self) -> alloc::string::String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; HASH_LEN]> for Digest {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

mod serde_digest {
    use super::HASH_LEN;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; HASH_LEN], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; HASH_LEN], D::Error> {
        let bytes = alloc::vec::Vec::<u8>::deserialize(d)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected a 32-byte digest"))
    }
}

/// The hash function used to derive keys, priorities and Merkle roots.
///
/// `spec.md` §4.1 requires a single collision-resistant, 256-bit output hash; `hash`
/// is always called on a UTF-8 textual encoding (never on the raw binary form of a
/// node), matching the reference's `H(x) = sha256(str(x).encode("utf-8")).hexdigest()`.
pub trait Hasher: Clone {
    /// Hashes the provided bytes into a digest.
    fn hash(data: &[u8]) -> Digest;
}

/// The SHA-256 hasher pinned by `spec.md` §6.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(data: &[u8]) -> Digest {
        use sha2::{Digest as _, Sha256};

        let out = Sha256::digest(data);
        Digest(out.into())
    }
}

/// The sentinel digest standing in for an absent child, `H("None")`.
pub fn hash_none<H: Hasher>() -> Digest {
    H::hash(b"None")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_none_matches_reference_constant() {
        // sha256("None").hexdigest(), cross-checked against
        // examples/original_source/treaccp/nodes.py (HASH_NONE = H("None")).
        let expected = "dc937b59892604f5a86ac96936cd7ff09e25f18ae6b758e8014a24c7fa039e91";
        let none = hash_none::<Sha256Hasher>();

        assert_eq!(none.to_hex(), expected);
    }

    #[test]
    fn hex_round_trips() {
        let d = hash_none::<Sha256Hasher>();
        let s = d.to_hex();
        let parsed: Digest = s.parse().unwrap();

        assert_eq!(d, parsed);
    }
}
