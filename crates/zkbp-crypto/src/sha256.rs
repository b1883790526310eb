//! # SHA-256 Integrity Digests
//!
//! Auxiliary, non-circuit digests over canonical payload bytes. These
//! never participate in commitment hashing — they exist so off-circuit
//! tooling (attestation records, CLI output, audit logs) can detect
//! payload drift with a standard hash.

use sha2::{Digest, Sha256};

use zkbp_core::{CanonicalBytes, IntegrityDigest};

/// Compute the SHA-256 integrity digest of canonical bytes.
///
/// Taking [`CanonicalBytes`] rather than `&[u8]` keeps the
/// canonicalization invariant: there is no way to digest bytes that did
/// not pass through the canonical serializer.
pub fn sha256_digest(data: &CanonicalBytes) -> IntegrityDigest {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    IntegrityDigest::new(hasher.finalize().into())
}
