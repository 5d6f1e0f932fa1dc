use cairn_types::{ContentId, IntegrityHash};
use sha2::{Digest, Sha256};

/// SHA-256 integrity hasher over identifier strings.
///
/// Deterministic and infallible for any `&str`. No domain tag is mixed in:
/// the digest must match what an external client computes with a plain
/// SHA-256 of the identifier.
pub struct IntegrityHasher;

impl IntegrityHasher {
    /// Digest an identifier string.
    pub fn digest(identifier: &str) -> IntegrityHash {
        IntegrityHash::from_digest(&Self::raw_digest(identifier.as_bytes()))
    }

    /// Digest a typed identifier.
    pub fn digest_id(identifier: &ContentId) -> IntegrityHash {
        Self::digest(identifier.as_str())
    }

    /// Re-derive the digest of `identifier` and compare it with `expected`.
    ///
    /// The comparison ignores ASCII case so externally produced upper-case
    /// digests still verify.
    pub fn verify(identifier: &str, expected: &IntegrityHash) -> bool {
        Self::digest(identifier)
            .as_str()
            .eq_ignore_ascii_case(expected.as_str())
    }

    /// Raw SHA-256 of arbitrary bytes.
    pub fn raw_digest(data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            IntegrityHasher::digest("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            IntegrityHasher::digest("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_covers_the_identifier_not_content() {
        let id = ContentId::from("bafyAAA");
        assert_eq!(
            IntegrityHasher::digest_id(&id),
            IntegrityHasher::digest("bafyAAA")
        );
        assert_ne!(
            IntegrityHasher::digest("bafyAAA"),
            IntegrityHasher::digest("bafyAAB")
        );
    }

    #[test]
    fn verify_correct_and_tampered() {
        let hash = IntegrityHasher::digest("bafyAAA");
        assert!(IntegrityHasher::verify("bafyAAA", &hash));
        assert!(!IntegrityHasher::verify("bafyBBB", &hash));
    }

    #[test]
    fn verify_ignores_case() {
        let upper = IntegrityHash::new(IntegrityHasher::digest("x").as_str().to_uppercase());
        assert!(IntegrityHasher::verify("x", &upper));
    }

    #[test]
    fn multibyte_identifiers_hash_utf8_bytes() {
        let direct = IntegrityHash::from_digest(&IntegrityHasher::raw_digest("ünï".as_bytes()));
        assert_eq!(IntegrityHasher::digest("ünï"), direct);
    }

    proptest! {
        #[test]
        fn digest_is_64_lower_hex(s in ".*") {
            let hash = IntegrityHasher::digest(&s);
            prop_assert_eq!(hash.as_str().len(), 64);
            prop_assert!(hash.as_str().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }

        #[test]
        fn digest_is_deterministic_and_verifies(s in ".*") {
            let a = IntegrityHasher::digest(&s);
            let b = IntegrityHasher::digest(&s);
            prop_assert!(IntegrityHasher::verify(&s, &a));
            prop_assert_eq!(a, b);
        }
    }
}
