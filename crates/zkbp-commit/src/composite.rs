//! # Composite Slot Folding
//!
//! A composite commitment carries one leaf commitment per enabled
//! commitment-bearing predicate, placed in a fixed array of
//! [`COMMITMENT_SLOTS`] slots at the predicate's own bit index
//! (registration 0, ownership 1, revenue 2, document 3). Every other
//! slot holds the zero field element, so the layout never shifts when a
//! policy disables some predicates.
//!
//! ## Invariant
//!
//! Each populated slot is salted with its own fresh nonce. Slots never
//! share salts: re-using one across slots would let a verifier correlate
//! sub-payloads across proofs.

use serde::{Deserialize, Serialize};

use zkbp_core::{
    CanonicalBytes, CommitmentPayload, CompositePayload, IntegrityDigest, Policy, Predicate,
    ZkbpError, COMMITMENT_SLOTS,
};
use zkbp_crypto::{sha256_digest, FieldElement, NonceSource, PoseidonHasher};

use crate::commit::{leaf_bundle, CommitmentBundle};

/// One populated slot of a composite commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCommitment {
    /// The predicate's fixed slot index (its policy bit index).
    pub slot: usize,
    /// The predicate this slot commits to.
    pub predicate: Predicate,
    /// The leaf commitment, its salt, and its integrity digest.
    pub bundle: CommitmentBundle,
}

/// A policy-folded composite commitment: the full fixed-width slot array
/// plus the per-slot detail needed to reopen each leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeCommitment {
    /// The policy the slots were packed under.
    pub policy: Policy,
    /// All ten slots; every slot not owned by an enabled predicate
    /// holds the zero element.
    pub slots: [FieldElement; COMMITMENT_SLOTS],
    /// Populated slots in ascending slot order.
    pub members: Vec<SlotCommitment>,
    /// SHA-256 of the canonical composite payload.
    pub integrity: IntegrityDigest,
}

impl CompositeCommitment {
    /// The slot detail for a predicate, if it was enabled.
    pub fn member(&self, predicate: Predicate) -> Option<&SlotCommitment> {
        self.members.iter().find(|m| m.predicate == predicate)
    }
}

/// Fold a validated composite payload into its slot array, drawing one
/// fresh salt per enabled predicate.
///
/// The payload is assumed validated by the caller
/// ([`crate::compute_commitment`] runs the full report first), so every
/// enabled predicate has its sub-payload present.
pub fn compute_composite(
    hasher: &PoseidonHasher,
    nonce_source: &mut dyn NonceSource,
    payload: &CompositePayload,
) -> Result<CompositeCommitment, ZkbpError> {
    let mut slots = [FieldElement::zero(); COMMITMENT_SLOTS];
    let mut members = Vec::new();
    for predicate in payload.policy.slot_predicates() {
        let Some(slot) = payload.policy.slot_of(predicate) else {
            continue;
        };
        let leaf = sub_payload(payload, predicate)?;
        let nonce = nonce_source
            .next_nonce()
            .map_err(|e| ZkbpError::Cryptographic(e.to_string()))?;
        let bundle = leaf_bundle(hasher, &leaf, nonce)?;
        slots[slot] = bundle.commitment;
        members.push(SlotCommitment {
            slot,
            predicate,
            bundle,
        });
    }
    let integrity = sha256_digest(&CanonicalBytes::new(&CommitmentPayload::Composite(
        payload.clone(),
    ))?);
    tracing::debug!(
        policy = %payload.policy,
        populated = members.len(),
        "folded composite commitment"
    );
    Ok(CompositeCommitment {
        policy: payload.policy,
        slots,
        members,
        integrity,
    })
}

/// Lift one enabled sub-payload into its leaf wire form.
fn sub_payload(
    payload: &CompositePayload,
    predicate: Predicate,
) -> Result<CommitmentPayload, ZkbpError> {
    let leaf = match predicate {
        Predicate::Registration => payload
            .registration
            .clone()
            .map(CommitmentPayload::Registration),
        Predicate::Ownership => payload.ownership.clone().map(CommitmentPayload::Ownership),
        Predicate::Revenue => payload.revenue.clone().map(CommitmentPayload::Revenue),
        Predicate::Document => payload.document.clone().map(CommitmentPayload::Document),
        Predicate::WalletBinding => None,
    };
    leaf.ok_or_else(|| {
        ZkbpError::Cryptographic(format!("enabled predicate {predicate} has no sub-payload"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_commitment, CommitmentOutput};
    use zkbp_core::{RegistrationPayload, RevenuePayload};
    use zkbp_crypto::FixedNonceSource;

    fn composite_0b101() -> CommitmentPayload {
        CommitmentPayload::Composite(CompositePayload {
            policy: Policy::from_raw(0b101),
            registration: Some(RegistrationPayload {
                business_id: "biz-1".into(),
                jurisdiction: "AE-DXB".into(),
                registration_number: "RN-77".into(),
                incorporation_year: 2019,
            }),
            ownership: None,
            revenue: Some(RevenuePayload {
                revenue_amount: 1_500_000,
                threshold: 1_000_000,
                currency: "USD".into(),
                reporting_period: "2024".into(),
            }),
            document: None,
        })
    }

    fn fold(nonces: impl IntoIterator<Item = u64>) -> CompositeCommitment {
        let hasher = PoseidonHasher::new();
        let mut source = FixedNonceSource::from_u64s(nonces);
        match compute_commitment(&hasher, &mut source, &composite_0b101()).unwrap() {
            CommitmentOutput::Composite(c) => c,
            CommitmentOutput::Single(_) => panic!("composite payload folds to slots"),
        }
    }

    #[test]
    fn each_enabled_predicate_lands_at_its_bit_index() {
        let folded = fold([11, 12]);
        assert_eq!(folded.members.len(), 2);
        assert_eq!(folded.members[0].predicate, Predicate::Registration);
        assert_eq!(folded.members[0].slot, 0);
        assert_eq!(folded.members[1].predicate, Predicate::Revenue);
        assert_eq!(folded.members[1].slot, 2);
        assert_eq!(folded.slots[0], folded.members[0].bundle.commitment);
        assert_eq!(folded.slots[2], folded.members[1].bundle.commitment);
    }

    #[test]
    fn disabled_slots_are_zero() {
        let folded = fold([11, 12]);
        // Policy 0b101: ownership (slot 1), document (slot 3), and the
        // tail are all disabled.
        assert!(folded.slots[1].is_zero());
        for slot in &folded.slots[3..] {
            assert!(slot.is_zero());
        }
    }

    #[test]
    fn document_only_policy_folds_into_slot_three() {
        use zkbp_core::{DocumentKind, DocumentPayload};
        let hasher = PoseidonHasher::new();
        let mut source = FixedNonceSource::from_u64s([41]);
        let payload = CommitmentPayload::Composite(CompositePayload {
            policy: Policy::from_raw(0b1000),
            registration: None,
            ownership: None,
            revenue: None,
            document: Some(DocumentPayload {
                document_hash: "0f".repeat(32),
                doc_kind: DocumentKind::AuditReport,
            }),
        });
        let CommitmentOutput::Composite(folded) =
            compute_commitment(&hasher, &mut source, &payload).unwrap()
        else {
            panic!("composite expected");
        };
        assert!(folded.slots[..3].iter().all(FieldElement::is_zero));
        assert!(!folded.slots[3].is_zero());
        assert!(folded.slots[4..].iter().all(FieldElement::is_zero));
        assert_eq!(folded.members[0].slot, 3);
    }

    #[test]
    fn each_slot_gets_its_own_nonce() {
        let folded = fold([11, 12]);
        assert_ne!(folded.members[0].bundle.nonce, folded.members[1].bundle.nonce);
        assert_eq!(folded.members[0].bundle.nonce, FieldElement::from_u64(11));
        assert_eq!(folded.members[1].bundle.nonce, FieldElement::from_u64(12));
    }

    #[test]
    fn same_payload_same_nonces_is_deterministic() {
        assert_eq!(fold([11, 12]), fold([11, 12]));
    }

    #[test]
    fn different_nonces_move_every_populated_slot() {
        let a = fold([11, 12]);
        let b = fold([21, 22]);
        assert_ne!(a.slots[0], b.slots[0]);
        assert_ne!(a.slots[2], b.slots[2]);
        // Payload content is identical, so the integrity digest is too.
        assert_eq!(a.integrity, b.integrity);
    }

    #[test]
    fn missing_enabled_subpayload_fails_validation() {
        let hasher = PoseidonHasher::new();
        let mut source = FixedNonceSource::from_u64s([1, 2]);
        let payload = CommitmentPayload::Composite(CompositePayload {
            policy: Policy::from_raw(0b101),
            registration: None,
            ownership: None,
            revenue: Some(RevenuePayload {
                revenue_amount: 5,
                threshold: 1,
                currency: "USD".into(),
                reporting_period: "2024".into(),
            }),
            document: None,
        });
        let err = compute_commitment(&hasher, &mut source, &payload).unwrap_err();
        assert!(matches!(err, ZkbpError::Validation(_)));
    }

    #[test]
    fn member_lookup_by_predicate() {
        let folded = fold([11, 12]);
        assert!(folded.member(Predicate::Registration).is_some());
        assert!(folded.member(Predicate::Ownership).is_none());
    }
}
