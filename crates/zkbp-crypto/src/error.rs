//! Crypto-layer error types.

use thiserror::Error;

use zkbp_core::OverflowError;

/// Errors from cryptographic primitives.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A hex string failed to parse as a field element.
    #[error("invalid hex field element \"{value}\": {reason}")]
    InvalidHex {
        /// The offending input (possibly truncated).
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A byte value exceeds the field modulus.
    #[error(transparent)]
    Overflow(#[from] OverflowError),

    /// The OS random source failed.
    #[error("random source failure: {0}")]
    RandomSource(String),
}
