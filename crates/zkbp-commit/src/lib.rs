//! # zkbp-commit — Commitment Computation
//!
//! Deterministically maps a typed payload plus a freshly drawn random
//! nonce into a single field-element commitment:
//!
//! ```text
//! commitment = Poseidon(encode(payload) ‖ nonce)
//! ```
//!
//! - [`encode`] defines the fixed, type-specific sub-field orderings and
//!   the three encodings (direct numeric, domain-hash, pass-through).
//! - [`commit`] validates, draws the nonce, hashes, and attaches the
//!   auxiliary SHA-256 integrity digest.
//! - [`composite`] folds leaf commitments into the ten policy-ordered
//!   slots, zero-filling every disabled slot.
//!
//! Computation is pure and stateless; independent commitments can be
//! evaluated fully in parallel. The hasher and nonce source are explicit
//! arguments — nothing here owns process-wide state.

pub mod commit;
pub mod composite;
pub mod encode;

pub use commit::{
    compute_commitment, compute_commitment_with_nonce, CommitmentBundle, CommitmentOutput,
};
pub use composite::{compute_composite, CompositeCommitment, SlotCommitment};
