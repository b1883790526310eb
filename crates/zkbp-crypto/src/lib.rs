//! # zkbp-crypto — Field and Hash Primitives
//!
//! Cryptographic primitives backing commitment computation:
//!
//! - [`FieldElement`]: a BN254 scalar field element with fixed-width hex
//!   wire encoding and strict (overflow-rejecting) byte conversion.
//! - [`PoseidonHasher`]: an explicitly constructed, dependency-injected
//!   SNARK-friendly sponge hash over the field. No process-wide lazy
//!   singleton — callers build one and pass it down.
//! - [`NonceSource`]: the commitment salt supplier. The production
//!   implementation rejection-samples a uniform non-zero field element
//!   from the OS CSPRNG; tests inject deterministic sources.
//! - [`sha256_digest`]: auxiliary integrity digests over canonical bytes,
//!   for off-circuit bookkeeping only.
//!
//! ## Security Invariants
//!
//! - A salt is never zero and never reused by the production source.
//! - Byte inputs that claim to be field elements are rejected, not
//!   reduced, when they exceed the modulus.
//! - Equality on commitments and bindings is constant-time
//!   ([`subtle::ConstantTimeEq`] on the fixed-width byte encoding).

pub mod error;
pub mod field;
pub mod nonce;
pub mod poseidon;
pub mod sha256;

pub use error::CryptoError;
pub use field::{hash_to_field, FieldElement, MODULUS_DECIMAL};
pub use nonce::{FixedNonceSource, NonceSource, OsNonceSource};
pub use poseidon::PoseidonHasher;
pub use sha256::sha256_digest;
