//! Policy range, slot structure, and validation boundary matrix.

use zkbp_commit::{compute_commitment, CommitmentOutput};
use zkbp_core::{
    CommitmentPayload, CompositePayload, OwnerShare, OwnershipPayload, Policy, RevenuePayload,
    ShareBps, Validate, ZkbpError, COMMITMENT_SLOTS,
};
use zkbp_crypto::{FieldElement, FixedNonceSource, PoseidonHasher};
use zkbp_verify::{RejectReason, VerificationOutcome, VerificationRequest, Verifier, WitnessBundle};

fn owners(shares: &[u32]) -> OwnershipPayload {
    OwnershipPayload {
        owners: shares
            .iter()
            .enumerate()
            .map(|(i, &bps)| OwnerShare {
                holder_id: format!("holder-{i}"),
                share_bps: ShareBps(bps),
            })
            .collect(),
    }
}

#[test]
fn share_sum_tolerance_boundaries() {
    // 99.98 % — accepted.
    assert!(owners(&[4999, 4999]).validate().is_valid());
    // 100.02 % — accepted.
    assert!(owners(&[5001, 5001]).validate().is_valid());
    // 95 % — rejected.
    assert!(!owners(&[4750, 4750]).validate().is_valid());
    // Exactly 100 % — accepted.
    assert!(owners(&[2500, 2500, 2500, 2500]).validate().is_valid());
}

#[test]
fn policy_range_boundaries() {
    assert!(Policy::new(0).is_err());
    assert!(Policy::new(32).is_err());
    for bits in 1..=31 {
        assert!(Policy::new(bits).is_ok());
    }
}

#[test]
fn out_of_range_policy_fails_composite_commitment() {
    let hasher = PoseidonHasher::new();
    for bits in [0u8, 32, 255] {
        let payload = CommitmentPayload::Composite(CompositePayload {
            policy: Policy::from_raw(bits),
            registration: None,
            ownership: None,
            revenue: None,
            document: None,
        });
        let mut source = FixedNonceSource::from_u64s([1, 2, 3, 4]);
        let err = compute_commitment(&hasher, &mut source, &payload).unwrap_err();
        assert!(matches!(err, ZkbpError::Validation(_)), "policy {bits} must fail");
    }
}

#[test]
fn every_single_bit_policy_folds_one_slot_or_none() {
    let hasher = PoseidonHasher::new();
    // Revenue-only: one populated slot.
    let payload = CommitmentPayload::Composite(CompositePayload {
        policy: Policy::from_raw(0b100),
        registration: None,
        ownership: None,
        revenue: Some(RevenuePayload {
            revenue_amount: 10,
            threshold: 5,
            currency: "USD".into(),
            reporting_period: "2024".into(),
        }),
        document: None,
    });
    let mut source = FixedNonceSource::from_u64s([9]);
    let CommitmentOutput::Composite(folded) =
        compute_commitment(&hasher, &mut source, &payload).unwrap()
    else {
        panic!("composite expected");
    };
    assert!(folded.slots[..2].iter().all(FieldElement::is_zero));
    assert!(!folded.slots[2].is_zero(), "revenue owns slot 2");
    assert!(folded.slots[3..].iter().all(FieldElement::is_zero));

    // Wallet-binding-only: no populated slots at all.
    let payload = CommitmentPayload::Composite(CompositePayload {
        policy: Policy::from_raw(0b10000),
        registration: None,
        ownership: None,
        revenue: None,
        document: None,
    });
    let mut source = FixedNonceSource::default();
    let CommitmentOutput::Composite(folded) =
        compute_commitment(&hasher, &mut source, &payload).unwrap()
    else {
        panic!("composite expected");
    };
    assert!(folded.slots.iter().all(FieldElement::is_zero));
    assert!(folded.members.is_empty());
}

#[test]
fn structural_gate_catches_every_slot_shape_violation() {
    let verifier = Verifier::new(PoseidonHasher::new());
    let policy = Policy::from_raw(0x7);

    let shapes: [(usize, &[usize]); 3] = [
        // A required slot left zero.
        (1, &[0, 2]),
        // A tail slot populated beyond the predicate slots.
        (2, &[0, 1, 2, 7]),
        // Everything zero.
        (3, &[]),
    ];
    for (nonce, populated) in shapes {
        let mut slots = [FieldElement::zero(); COMMITMENT_SLOTS];
        for &slot in populated {
            slots[slot] = FieldElement::from_u64(slot as u64 + 1);
        }
        let request = VerificationRequest {
            policy,
            slots,
            nonce: FieldElement::from_u64(nonce as u64),
            wallet_binding: None,
        };
        let outcome = verifier.verify(&request, &WitnessBundle::default());
        assert!(
            matches!(
                outcome,
                VerificationOutcome::Rejected(RejectReason::Structural { .. })
            ),
            "shape {populated:?} must fail structurally, got {outcome:?}"
        );
    }
}

#[test]
fn composite_validation_collects_violations_across_subpayloads() {
    // Bad policy bit (registration enabled but absent) and a bad revenue
    // figure in one report.
    let payload = CompositePayload {
        policy: Policy::from_raw(0b101),
        registration: None,
        ownership: None,
        revenue: Some(RevenuePayload {
            revenue_amount: 0,
            threshold: 1,
            currency: "USD".into(),
            reporting_period: "2024".into(),
        }),
        document: None,
    };
    let report = payload.validate();
    assert!(!report.is_valid());
    assert!(report.violations.len() >= 2);
    let fields: Vec<&str> = report.violations.iter().map(|v| v.field.as_str()).collect();
    assert!(fields.iter().any(|f| f.contains("registration")));
    assert!(fields.iter().any(|f| f.contains("revenue")));
}
