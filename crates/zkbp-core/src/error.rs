//! # Error Hierarchy
//!
//! Structured error types for the zkbp stack, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! The taxonomy follows the three caller-facing failure classes of the
//! commitment layer:
//!
//! - [`ZkbpError::Validation`] — malformed or out-of-range input. The
//!   report lists every violated rule, not just the first. Recoverable
//!   by the caller correcting the input.
//! - [`ZkbpError::UnsupportedType`] — unknown commitment type tag.
//! - [`ZkbpError::Overflow`] — a 32-byte value exceeds the field
//!   modulus.
//!
//! No error in this layer is fatal to a host process; each failure is
//! local to one request and there is no shared mutable state to corrupt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationReport;

/// Top-level error type for the zkbp stack.
#[derive(Error, Debug)]
pub enum ZkbpError {
    /// Structural or range validation failure. Carries every violated rule.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationReport),

    /// Unknown commitment or circuit type tag.
    #[error("unsupported commitment type: {0}")]
    UnsupportedType(String),

    /// Numeric value outside the field modulus.
    #[error("overflow: {0}")]
    Overflow(#[from] OverflowError),

    /// Canonicalization failure during integrity digest computation.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Cryptographic operation failure (random source, malformed hex).
    #[error("cryptographic error: {0}")]
    Cryptographic(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Overflow errors for raw field-element inputs.
///
/// Field elements live in a 254-bit prime field; raw 32-byte values can
/// exceed the modulus and must be rejected rather than silently reduced
/// wherever the caller supplied an exact value (document hashes, nonces,
/// wallet secrets).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverflowError {
    /// A 32-byte value is not a canonical field element (>= modulus).
    #[error("{context}: value exceeds the BN254 scalar field modulus")]
    ExceedsFieldModulus {
        /// Which input was rejected.
        context: String,
    },
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts must be integers with a documented scale.
    #[error("float values are not permitted in canonical representations; use scaled integers: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A 32-byte SHA-256 integrity digest of a canonical payload.
///
/// Non-cryptographic bookkeeping only — the hiding/binding digest is the
/// Poseidon commitment, not this value. Stored alongside commitments so
/// off-circuit tooling can detect payload drift without field arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegrityDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl IntegrityDigest {
    /// Wrap a raw 32-byte digest.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for IntegrityDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}
