//! # Policy-Gated Verification Protocol
//!
//! One verification attempt is a tiny state machine:
//!
//! ```text
//! Pending ── structural ──▶ Rejected(Structural)
//!    │
//!    ├── per-predicate ───▶ Rejected(CommitmentMismatch { slot })
//!    │
//!    ├── replay/binding ──▶ Rejected(Replay)
//!    │
//!    └─────────────────────▶ Verified
//! ```
//!
//! Both terminal states are final; there are no internal retries. Checks
//! run strictly in the order above so a rejection reason always names
//! the first gate the attempt failed.
//!
//! ## Security Invariant
//!
//! Commitment and binding equality use `subtle::ConstantTimeEq` over the
//! fixed-width byte encodings. An attacker probing slot values must not
//! learn byte prefixes from response timing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use zkbp_attest::{AttestationRegistry, Validity};
use zkbp_commit::compute_commitment_with_nonce;
use zkbp_core::{CommitmentPayload, Policy, Predicate, COMMITMENT_SLOTS};
use zkbp_crypto::{FieldElement, PoseidonHasher};

use crate::witness::WitnessBundle;

/// Why an attempt was rejected. Ordered by gate: a reason from a later
/// gate implies every earlier gate passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Policy range or slot-shape violation.
    Structural { detail: String },
    /// A recomputed commitment disagreed with the slot value.
    CommitmentMismatch { slot: usize },
    /// Nonce replay or wallet-binding failure.
    Replay { detail: String },
    /// A slot's commitment lacks a currently valid attestation.
    AttestationInvalid { slot: usize, validity: Validity },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Structural { detail } => write!(f, "structural: {detail}"),
            RejectReason::CommitmentMismatch { slot } => {
                write!(f, "commitment mismatch at slot {slot}")
            }
            RejectReason::Replay { detail } => write!(f, "replay/binding: {detail}"),
            RejectReason::AttestationInvalid { slot, validity } => {
                write!(f, "attestation invalid at slot {slot}: {validity}")
            }
        }
    }
}

/// Terminal outcome of one verification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified,
    Rejected(RejectReason),
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }
}

/// The public side of a verification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Which predicates the proof claims to satisfy.
    pub policy: Policy,
    /// The ten commitment slots; each enabled predicate's commitment
    /// sits at the predicate's own bit index.
    pub slots: [FieldElement; COMMITMENT_SLOTS],
    /// Single-use request nonce; consumed on successful verification.
    pub nonce: FieldElement,
    /// Public wallet-binding value, required when policy bit 4 is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_binding: Option<FieldElement>,
}

/// The verifier: an injected hasher plus the set of consumed request
/// nonces.
///
/// Nonces are consumed only by successful attempts — a rejected request
/// may be corrected and retried under the same nonce.
pub struct Verifier {
    hasher: PoseidonHasher,
    consumed: Mutex<HashSet<FieldElement>>,
}

impl Verifier {
    pub fn new(hasher: PoseidonHasher) -> Self {
        Self {
            hasher,
            consumed: Mutex::new(HashSet::new()),
        }
    }

    /// Run one attempt through the three gates.
    pub fn verify(
        &self,
        request: &VerificationRequest,
        witnesses: &WitnessBundle,
    ) -> VerificationOutcome {
        if let Some(reason) = self
            .check_structural(request, witnesses)
            .or_else(|| self.check_predicates(request, witnesses))
            .or_else(|| self.check_replay_binding(request, witnesses))
        {
            tracing::info!(policy = %request.policy, %reason, "verification rejected");
            return VerificationOutcome::Rejected(reason);
        }
        self.consumed.lock().insert(request.nonce);
        tracing::info!(policy = %request.policy, "verification succeeded");
        VerificationOutcome::Verified
    }

    /// Run one attempt, then gate every populated slot on the
    /// attestation registry.
    pub fn verify_with_attestations(
        &self,
        request: &VerificationRequest,
        witnesses: &WitnessBundle,
        registry: &AttestationRegistry,
        now: DateTime<Utc>,
    ) -> VerificationOutcome {
        let outcome = self.verify(request, witnesses);
        if !outcome.is_verified() {
            return outcome;
        }
        for predicate in request.policy.slot_predicates() {
            let Some(slot) = request.policy.slot_of(predicate) else {
                continue;
            };
            let validity = registry.validity(&request.slots[slot], now);
            if validity != Validity::Valid {
                tracing::info!(slot, %validity, "attestation gate rejected");
                return VerificationOutcome::Rejected(RejectReason::AttestationInvalid {
                    slot,
                    validity,
                });
            }
        }
        VerificationOutcome::Verified
    }

    /// Gate 1: policy range, fixed slot layout, witness completeness.
    ///
    /// Each commitment-bearing predicate owns the slot at its bit index;
    /// a slot is populated exactly when its predicate is enabled, and
    /// slots 4–9 are always zero.
    fn check_structural(
        &self,
        request: &VerificationRequest,
        witnesses: &WitnessBundle,
    ) -> Option<RejectReason> {
        if let Err(e) = request.policy.check() {
            return Some(structural(e.to_string()));
        }
        for predicate in Predicate::COMMITMENT_BEARING {
            let slot = predicate.bit().trailing_zeros() as usize;
            let populated = !request.slots[slot].is_zero();
            if request.policy.enables(predicate) && !populated {
                return Some(structural(format!(
                    "slot {slot} ({predicate}) required by the policy but zero"
                )));
            }
            if !request.policy.enables(predicate) && populated {
                return Some(structural(format!(
                    "slot {slot} populated but the policy disables {predicate}"
                )));
            }
        }
        for (slot, value) in request.slots.iter().enumerate().skip(4) {
            if !value.is_zero() {
                return Some(structural(format!(
                    "slot {slot} populated beyond the predicate slots"
                )));
            }
        }
        for predicate in request.policy.slot_predicates() {
            if !witnesses.has(predicate) {
                return Some(structural(format!("missing witness for {predicate}")));
            }
        }
        None
    }

    /// Gate 2: recompute every enabled slot from its witness and compare
    /// constant-time.
    fn check_predicates(
        &self,
        request: &VerificationRequest,
        witnesses: &WitnessBundle,
    ) -> Option<RejectReason> {
        for predicate in request.policy.slot_predicates() {
            let Some(slot) = request.policy.slot_of(predicate) else {
                continue;
            };
            let opened = match predicate {
                Predicate::Registration => witnesses.registration.as_ref().map(|w| {
                    (CommitmentPayload::Registration(w.payload.clone()), w.nonce)
                }),
                Predicate::Ownership => witnesses.ownership.as_ref().map(|w| {
                    (CommitmentPayload::Ownership(w.payload.clone()), w.nonce)
                }),
                Predicate::Revenue => witnesses.revenue.as_ref().map(|w| {
                    (CommitmentPayload::Revenue(w.payload.clone()), w.nonce)
                }),
                Predicate::Document => witnesses.document.as_ref().map(|w| {
                    (CommitmentPayload::Document(w.payload.clone()), w.nonce)
                }),
                Predicate::WalletBinding => None,
            };
            // The structural gate already requires this witness; fail
            // closed rather than pass if it is somehow absent here.
            let Some((payload, nonce)) = opened else {
                return Some(structural(format!("missing witness for {predicate}")));
            };
            let recomputed = match compute_commitment_with_nonce(&self.hasher, &payload, nonce) {
                Ok(bundle) => bundle.commitment,
                // An unencodable witness cannot open any slot.
                Err(e) => return Some(structural(format!("witness for {predicate}: {e}"))),
            };
            if !bool::from(recomputed.ct_eq(&request.slots[slot])) {
                return Some(RejectReason::CommitmentMismatch { slot });
            }
        }
        None
    }

    /// Gate 3: request nonce freshness and wallet binding.
    fn check_replay_binding(
        &self,
        request: &VerificationRequest,
        witnesses: &WitnessBundle,
    ) -> Option<RejectReason> {
        if request.nonce.is_zero() {
            return Some(replay("request nonce must be non-zero"));
        }
        if self.consumed.lock().contains(&request.nonce) {
            return Some(replay("request nonce already consumed"));
        }
        if request.policy.wallet_binding() {
            let Some(expected) = request.wallet_binding else {
                return Some(replay("policy requires wallet binding but none was supplied"));
            };
            let Some(secret) = witnesses.wallet_secret.as_ref() else {
                return Some(replay("policy requires a wallet secret witness"));
            };
            let secret_fe = match secret.to_field() {
                Ok(fe) => fe,
                Err(e) => return Some(replay(format!("wallet secret: {e}"))),
            };
            let binding = self.hasher.hash_pair(request.nonce, secret_fe);
            if !bool::from(binding.ct_eq(&expected)) {
                return Some(replay("wallet binding value does not match"));
            }
        }
        None
    }
}

fn structural(detail: impl Into<String>) -> RejectReason {
    RejectReason::Structural {
        detail: detail.into(),
    }
}

fn replay(detail: impl Into<String>) -> RejectReason {
    RejectReason::Replay {
        detail: detail.into(),
    }
}
