//! # zkbp-attest — Attestation Lifecycle
//!
//! Binds commitments to real-world vouching: an authorized issuer
//! attests that a commitment reflects facts it has verified, for a
//! bounded or unbounded window. Verification consults this registry to
//! reject proofs whose commitments were never attested, have expired,
//! were revoked, or came from issuers that lost their authorization.
//!
//! The registry is in-memory and append-only. Durable storage is the
//! embedding application's concern; everything here is process state
//! behind a [`parking_lot::RwLock`].

pub mod record;
pub mod registry;

pub use record::{AttestationRecord, IssuerId};
pub use registry::{AttestError, AttestationRegistry, Validity};
