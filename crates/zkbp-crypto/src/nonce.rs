//! # Nonce Sourcing
//!
//! Every commitment binds a single-use random salt. The [`NonceSource`]
//! trait makes the salt supplier an explicit dependency of commitment
//! computation, so production code draws from the OS CSPRNG while tests
//! inject fixed values for reproducible vectors.
//!
//! ## Security Invariants
//!
//! - A nonce is uniform over `[1, field order)` — never zero (a zero salt
//!   defeats replay detection) and never biased (rejection sampling, not
//!   modular reduction).
//! - The production source never returns the same value twice for
//!   independent draws, up to CSPRNG guarantees. Reusing a nonce across
//!   two commitments over the same secret breaks hiding.

use std::collections::VecDeque;

use rand_core::{OsRng, RngCore};

use crate::error::CryptoError;
use crate::field::{FieldElement, FIELD_BYTES};

/// Supplier of single-use commitment salts.
pub trait NonceSource {
    /// Draw the next nonce: uniform, non-zero, canonical.
    fn next_nonce(&mut self) -> Result<FieldElement, CryptoError>;
}

/// Production nonce source backed by the operating system CSPRNG.
///
/// `OsRng` is stateless and thread-safe; construct one per call site or
/// share freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_nonce(&mut self) -> Result<FieldElement, CryptoError> {
        // Rejection-sample: draw 32 bytes, accept only canonical non-zero
        // field elements. Acceptance probability is ~p/2^256 ≈ 0.19 per
        // draw, so a handful of iterations suffices in practice.
        loop {
            let mut bytes = [0u8; FIELD_BYTES];
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| CryptoError::RandomSource(e.to_string()))?;
            if let Ok(candidate) = FieldElement::from_bytes_strict(&bytes, "nonce") {
                if !candidate.is_zero() {
                    return Ok(candidate);
                }
            }
        }
    }
}

/// Deterministic nonce source for tests and vector regeneration.
///
/// Yields the queued elements in order and fails once exhausted, so a
/// test that consumes more nonces than it provisioned fails loudly
/// instead of silently reusing salts.
#[derive(Debug, Clone, Default)]
pub struct FixedNonceSource {
    queue: VecDeque<FieldElement>,
}

impl FixedNonceSource {
    /// Queue the given nonces.
    pub fn new(nonces: impl IntoIterator<Item = FieldElement>) -> Self {
        Self {
            queue: nonces.into_iter().collect(),
        }
    }

    /// Convenience: queue nonces lifted from machine integers.
    pub fn from_u64s(values: impl IntoIterator<Item = u64>) -> Self {
        Self::new(values.into_iter().map(FieldElement::from_u64))
    }
}

impl NonceSource for FixedNonceSource {
    fn next_nonce(&mut self) -> Result<FieldElement, CryptoError> {
        self.queue
            .pop_front()
            .ok_or_else(|| CryptoError::RandomSource("fixed nonce source exhausted".to_string()))
    }
}
