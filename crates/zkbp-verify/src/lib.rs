//! # zkbp-verify — Policy-Gated Composite Verification
//!
//! Checks a proof attempt against its claimed policy: structural slot
//! shape first, then per-predicate commitment recomputation over the
//! supplied witnesses, then replay and wallet-binding enforcement, and
//! optionally the attestation registry gate.
//!
//! The verifier never learns more than the attempt reveals: payloads
//! arrive only as witnesses the prover chose to open, all equality is
//! constant-time, and wallet secrets are zeroized on drop.

pub mod protocol;
pub mod witness;

pub use protocol::{RejectReason, VerificationOutcome, VerificationRequest, Verifier};
pub use witness::{WalletSecret, Witness, WitnessBundle};
