//! Extraction of content identifiers from media references.
//!
//! Records point at their media with free-form strings. The forms recognized
//! here are:
//!
//! - `ipfs://<id>[/path]` (also `ipfs://ipfs/<id>`)
//! - `/ipfs/<id>[/path]`, bare or behind a gateway host
//!   (`https://gateway.example/ipfs/<id>`)
//! - subdomain gateways, `https://<id>.ipfs.gateway.example/`
//! - a bare identifier
//!
//! Anything else yields `None`.

use cairn_types::ContentId;

const SCHEME: &str = "ipfs://";
const PATH_SEGMENT: &str = "/ipfs/";
const SUBDOMAIN_MARKER: &str = ".ipfs.";

/// Pull the content identifier out of a media reference, if it names one.
pub fn extract_reference(reference: &str) -> Option<ContentId> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Some(rest) = reference.strip_prefix(SCHEME) {
        let rest = rest.strip_prefix("ipfs/").unwrap_or(rest);
        return leading_identifier(rest);
    }
    if let Some(index) = reference.find(PATH_SEGMENT) {
        return leading_identifier(&reference[index + PATH_SEGMENT.len()..]);
    }
    if let Some((_, rest)) = reference.split_once("://") {
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        return host
            .find(SUBDOMAIN_MARKER)
            .and_then(|index| identifier(&host[..index]));
    }
    identifier(reference)
}

fn leading_identifier(path: &str) -> Option<ContentId> {
    identifier(path.split(['/', '?', '#']).next().unwrap_or_default())
}

fn identifier(candidate: &str) -> Option<ContentId> {
    let valid = !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ContentId::from(candidate))
}
