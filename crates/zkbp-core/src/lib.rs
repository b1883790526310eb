//! # zkbp-core — Domain Model for Policy-Gated Compliance Commitments
//!
//! Defines the data model shared by the whole zkbp stack:
//!
//! - [`CommitmentPayload`]: a closed tagged union over the five commitment
//!   categories (registration, ownership/UBO, revenue, document, composite).
//!   Adding a category is a compile-time-checked change — every consumer
//!   matches exhaustively.
//! - [`Policy`]: the 5-bit predicate bitmask that selects which compliance
//!   predicates a composite proof must satisfy, and how the ten commitment
//!   slots are laid out.
//! - [`Validate`]: structural and range validation that collects **every**
//!   violation instead of short-circuiting, so a caller sees all problems
//!   in one round trip.
//! - [`CanonicalBytes`]: the sole construction path for bytes fed into
//!   integrity digests. Floats are rejected — amounts are integers with
//!   documented scale, never silently coerced.
//!
//! ## Fixed-Point Conventions
//!
//! Monetary amounts are whole currency units (`u64`). Ownership shares are
//! basis points of the whole (`ShareBps`, 1 bp = 0.01 %), so 100 % is
//! exactly 10 000 and the share-sum tolerance is an integer comparison.
//! No field in this crate is ever a float.

pub mod canonical;
pub mod error;
pub mod payload;
pub mod policy;
pub mod validation;

pub use canonical::CanonicalBytes;
pub use error::{
    CanonicalizationError, IntegrityDigest, OverflowError, ZkbpError,
};
pub use payload::{
    CommitmentKind, CommitmentPayload, CompositePayload, DocumentKind, DocumentPayload,
    OwnerShare, OwnershipPayload, RegistrationPayload, RevenuePayload, ShareBps,
    MAX_OWNERS, REVENUE_CAP, REVENUE_MIN, SHARE_SCALE_BPS, SHARE_SUM_TOLERANCE_BPS,
};
pub use policy::{Policy, PolicyError, Predicate, COMMITMENT_SLOTS, POLICY_MAX, POLICY_MIN};
pub use validation::{validate_nonce_hex, Validate, ValidationReport, Violation};
