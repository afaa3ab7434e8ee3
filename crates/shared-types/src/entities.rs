//! # Core Value Types
//!
//! Fixed-width identifiers used across the PPoS subsystems.
//!
//! | Type | Width | Meaning |
//! |------|-------|---------|
//! | `Address` | 20 bytes | Account / contract address |
//! | `NodeId` | 64 bytes | Uncompressed secp256k1 public key without the `0x04` tag |
//! | `BlsPublicKey` | 96 bytes | Compressed BLS12-381 G2 public key |
//! | `Hash` | 32 bytes | Keccak-256 digest |
//!
//! All fixed-width types encode as RLP byte strings of their exact width and
//! serialize to JSON as `0x`-prefixed hex, so a genesis file can list node
//! identities the same way operators copy them from node logs.

use crate::errors::BytesError;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// The all-zero digest. Seed of every rolling hash.
pub const ZERO_HASH: Hash = [0u8; 32];

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Wraps a byte array.
            #[must_use]
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copies from a slice, rejecting any other width.
            pub fn from_slice(slice: &[u8]) -> Result<Self, BytesError> {
                let bytes: [u8; $len] =
                    slice.try_into().map_err(|_| BytesError::InvalidLength {
                        expected: $len,
                        actual: slice.len(),
                    })?;
                Ok(Self(bytes))
            }

            /// Returns the underlying bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Returns true if every byte is zero.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $len]
            }

            /// `0x`-prefixed lowercase hex.
            #[must_use]
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = BytesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                let bytes =
                    hex::decode(digits).map_err(|e| BytesError::InvalidHex(e.to_string()))?;
                Self::from_slice(&bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }

        impl Encodable for $name {
            fn rlp_append(&self, s: &mut RlpStream) {
                s.encoder().encode_value(&self.0);
            }
        }

        impl Decodable for $name {
            fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
                rlp.decoder().decode_value(|bytes| {
                    Self::from_slice(bytes).map_err(|_| DecoderError::RlpInvalidLength)
                })
            }
        }
    };
}

fixed_bytes!(
    /// A 20-byte account address.
    Address,
    20
);

fixed_bytes!(
    /// Node identity: the 64-byte uncompressed secp256k1 public key of a node,
    /// without the SEC1 `0x04` tag.
    NodeId,
    64
);

fixed_bytes!(
    /// Compressed BLS12-381 public key used for consensus vote aggregation.
    BlsPublicKey,
    96
);

/// Big-endian bytes of a `U256` with leading zeros stripped (empty for zero).
///
/// This is the canonical byte form of monetary amounts in account state.
#[must_use]
pub fn u256_to_min_be_bytes(value: U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    let start = buf.iter().position(|&b| b != 0).unwrap_or(buf.len());
    buf[start..].to_vec()
}
