//! Ledger key layout for the registry indices.

use cairn_types::{ContentId, IntegrityHash, Owner};

pub const RECORD_PREFIX: &str = "record/";
pub const HASH_PREFIX: &str = "hash/";
pub const OWNER_PREFIX: &str = "owner/";

pub fn record_key(identifier: &ContentId) -> String {
    format!("{RECORD_PREFIX}{identifier}")
}

pub fn hash_key(hash: &IntegrityHash) -> String {
    format!("{HASH_PREFIX}{hash}")
}

pub fn owner_key(owner: &Owner) -> String {
    format!("{OWNER_PREFIX}{owner}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_keep_indices_disjoint() {
        let id = ContentId::from("x");
        let hash = IntegrityHash::from("x");
        let owner = Owner::from("x");
        assert_eq!(record_key(&id), "record/x");
        assert_ne!(record_key(&id), hash_key(&hash));
        assert_ne!(hash_key(&hash), owner_key(&owner));
    }
}
