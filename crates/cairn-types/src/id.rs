use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

macro_rules! string_newtype {
    ($name:ident, $label:literal) => {
        impl $name {
            /// Wrap a string without validation.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// The underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the underlying string is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Wrap a string, rejecting the empty string.
            pub fn non_empty(value: impl Into<String>) -> Result<Self, TypeError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(TypeError::Empty($label));
                }
                Ok(Self(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Content-addressed reference naming a piece of content in a content store.
///
/// Cairn never interprets the identifier's structure; any string a store
/// hands back from `add` is a valid identifier. The empty string is the
/// "no identifier" sentinel and is rejected on every mutating path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

string_newtype!(ContentId, "identifier");

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

/// Integrity digest recorded alongside an identifier.
///
/// Produced by `cairn_crypto::IntegrityHasher` as 64 lower-case hex
/// characters. The registry only requires it to be non-empty; use
/// [`IntegrityHash::parse`] when the digest shape must be checked.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrityHash(String);

string_newtype!(IntegrityHash, "integrity hash");

impl IntegrityHash {
    /// Hex-encode a raw 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse a hex digest, normalizing to lower case.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::Empty("integrity hash"));
        }
        if s.len() != DIGEST_HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                actual: s.len(),
            });
        }
        hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Short form (first 8 characters) for log lines.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(8);
        self.0.get(..end).unwrap_or(&self.0)
    }
}

impl fmt::Debug for IntegrityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntegrityHash({})", self.short())
    }
}

/// Opaque principal identifier, e.g. an account address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

string_newtype!(Owner, "owner");

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_rejects_empty_string() {
        assert_eq!(
            ContentId::non_empty("").unwrap_err(),
            TypeError::Empty("identifier")
        );
        assert_eq!(Owner::non_empty("").unwrap_err(), TypeError::Empty("owner"));
        assert!(ContentId::non_empty("bafyAAA").is_ok());
    }

    #[test]
    fn display_is_the_raw_string() {
        let id = ContentId::from("bafyAAA");
        assert_eq!(format!("{id}"), "bafyAAA");
        assert_eq!(format!("{id:?}"), "ContentId(bafyAAA)");
    }

    #[test]
    fn from_digest_is_lower_hex() {
        let hash = IntegrityHash::from_digest(&[0xAB; 32]);
        assert_eq!(hash.as_str().len(), DIGEST_HEX_LEN);
        assert!(hash.as_str().chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn parse_normalizes_case() {
        let upper = "AB".repeat(32);
        let parsed = IntegrityHash::parse(&upper).unwrap();
        assert_eq!(parsed.as_str(), "ab".repeat(32));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            IntegrityHash::parse("").unwrap_err(),
            TypeError::Empty("integrity hash")
        );
        assert_eq!(
            IntegrityHash::parse("abc").unwrap_err(),
            TypeError::InvalidLength {
                expected: 64,
                actual: 3
            }
        );
        assert!(matches!(
            IntegrityHash::parse(&"zz".repeat(32)).unwrap_err(),
            TypeError::InvalidHex(_)
        ));
    }

    #[test]
    fn short_handles_short_values() {
        assert_eq!(IntegrityHash::from("6f2c").short(), "6f2c");
        assert_eq!(IntegrityHash::from_digest(&[0x11; 32]).short(), "11111111");
    }

    #[test]
    fn serde_is_transparent() {
        let owner = Owner::from("0xabc");
        let json = serde_json::to_string(&owner).unwrap();
        assert_eq!(json, "\"0xabc\"");
        let parsed: Owner = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, owner);
    }
}
