use md5::Md5;
use sha2::{Digest, Sha256};

use crate::core::model::FingerprintSet;

/// Digest the exact concatenation `display_name + biography`.
///
/// No separator and no normalization, so identical bytes always give
/// identical fingerprints.
pub fn fingerprint(display_name: &str, biography: &str) -> FingerprintSet {
    let mut content = Vec::with_capacity(display_name.len() + biography.len());
    content.extend_from_slice(display_name.as_bytes());
    content.extend_from_slice(biography.as_bytes());

    FingerprintSet {
        weak: format!("{:x}", Md5::digest(&content)),
        strong: format!("{:x}", Sha256::digest(&content)),
    }
}
