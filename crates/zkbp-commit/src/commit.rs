//! # Commitment Computation
//!
//! The single entry point for turning a validated payload into a
//! commitment. Validation runs first and collects every violation; only
//! a clean payload reaches the hasher.
//!
//! Recomputing over identical ordered inputs and the same nonce yields a
//! bit-identical commitment — verification relies on exactly this via
//! [`compute_commitment_with_nonce`].

use serde::{Deserialize, Serialize};

use zkbp_core::{
    CanonicalBytes, CommitmentPayload, IntegrityDigest, Validate, ValidationReport, ZkbpError,
};
use zkbp_crypto::{sha256_digest, FieldElement, NonceSource, PoseidonHasher};

use crate::composite::{compute_composite, CompositeCommitment};
use crate::encode;

/// A computed leaf commitment with its salt and bookkeeping digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentBundle {
    /// The Poseidon commitment.
    pub commitment: FieldElement,
    /// The single-use salt appended last in the hash input.
    pub nonce: FieldElement,
    /// SHA-256 of the canonical payload JSON (off-circuit bookkeeping).
    pub integrity: IntegrityDigest,
}

/// Output of [`compute_commitment`]: one bundle for leaf payloads, a
/// slot-folded structure for composites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CommitmentOutput {
    /// A single leaf commitment.
    Single(CommitmentBundle),
    /// A policy-folded composite commitment.
    Composite(CompositeCommitment),
}

/// Compute a commitment for any payload, drawing fresh salts from the
/// given source.
///
/// Composite payloads recurse per enabled sub-type, drawing one salt per
/// populated slot.
///
/// # Errors
///
/// - [`ZkbpError::Validation`] with every violated rule.
/// - [`ZkbpError::Overflow`] when a pass-through hash exceeds the modulus.
/// - [`ZkbpError::Cryptographic`] when the salt source fails.
pub fn compute_commitment(
    hasher: &PoseidonHasher,
    nonce_source: &mut dyn NonceSource,
    payload: &CommitmentPayload,
) -> Result<CommitmentOutput, ZkbpError> {
    payload.validate().into_result()?;
    match payload {
        CommitmentPayload::Composite(composite) => Ok(CommitmentOutput::Composite(
            compute_composite(hasher, nonce_source, composite)?,
        )),
        leaf => {
            let nonce = nonce_source
                .next_nonce()
                .map_err(|e| ZkbpError::Cryptographic(e.to_string()))?;
            let bundle = leaf_bundle(hasher, leaf, nonce)?;
            tracing::debug!(
                kind = %leaf.kind(),
                commitment = %bundle.commitment,
                "computed leaf commitment"
            );
            Ok(CommitmentOutput::Single(bundle))
        }
    }
}

/// Recompute a leaf commitment under a caller-supplied nonce.
///
/// This is the deterministic half of the contract: verification and test
/// vectors recompute with the recorded salt. Composite payloads are not
/// accepted here — they carry one salt per slot, not one overall.
pub fn compute_commitment_with_nonce(
    hasher: &PoseidonHasher,
    payload: &CommitmentPayload,
    nonce: FieldElement,
) -> Result<CommitmentBundle, ZkbpError> {
    if matches!(payload, CommitmentPayload::Composite(_)) {
        return Err(ZkbpError::UnsupportedType(
            "composite payloads carry one nonce per slot; recompute the slots individually"
                .to_string(),
        ));
    }
    if nonce.is_zero() {
        let mut report = ValidationReport::empty();
        report.push("nonce", "must be non-zero");
        return Err(ZkbpError::Validation(report));
    }
    payload.validate().into_result()?;
    leaf_bundle(hasher, payload, nonce)
}

/// Encode, append the salt, hash, and attach the integrity digest.
pub(crate) fn leaf_bundle(
    hasher: &PoseidonHasher,
    payload: &CommitmentPayload,
    nonce: FieldElement,
) -> Result<CommitmentBundle, ZkbpError> {
    let mut fields = match payload {
        CommitmentPayload::Registration(p) => encode::encode_registration(p),
        CommitmentPayload::Ownership(p) => encode::encode_ownership(p),
        CommitmentPayload::Revenue(p) => encode::encode_revenue(p),
        CommitmentPayload::Document(p) => encode::encode_document(p)?,
        CommitmentPayload::Composite(_) => {
            return Err(ZkbpError::UnsupportedType(
                "composite payloads are folded, not leaf-encoded".to_string(),
            ))
        }
    };
    fields.push(nonce);
    let commitment = hasher.hash(&fields);
    let integrity = sha256_digest(&CanonicalBytes::new(payload)?);
    Ok(CommitmentBundle {
        commitment,
        nonce,
        integrity,
    })
}
