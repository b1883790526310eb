//! # Attestation Registry
//!
//! In-memory, thread-safe store of attestation records keyed by
//! commitment, plus the authorized-issuer set.
//!
//! ## Security Invariant
//!
//! Records are never deleted. Revocation and issuer deauthorization mark
//! state; history stays queryable. A commitment that was once attested
//! can therefore always be distinguished from one that never was.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use zkbp_crypto::FieldElement;

use crate::record::{AttestationRecord, IssuerId};

/// Registry operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttestError {
    /// The issuer is not in the authorized set.
    #[error("issuer \"{0}\" is not authorized to attest")]
    IssuerNotAuthorized(IssuerId),
    /// No record with this identifier exists.
    #[error("no attestation record with id {0}")]
    UnknownRecord(Uuid),
    /// The requested expiry precedes the issue time.
    #[error("expiry {expires_at} is not after issue time {issued_at}")]
    ExpiryBeforeIssue {
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
}

/// Outcome of an attestation validity query for one commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    /// At least one live attestation from an authorized issuer.
    Valid,
    /// No attestation record exists for the commitment.
    NotAttested,
    /// All records were revoked.
    Revoked,
    /// All records expired.
    Expired,
    /// The attesting issuers have been deauthorized.
    IssuerDeauthorized,
}

impl std::fmt::Display for Validity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Validity::Valid => "valid",
            Validity::NotAttested => "not_attested",
            Validity::Revoked => "revoked",
            Validity::Expired => "expired",
            Validity::IssuerDeauthorized => "issuer_deauthorized",
        };
        f.write_str(name)
    }
}

#[derive(Default)]
struct RegistryState {
    issuers: HashSet<IssuerId>,
    by_commitment: HashMap<FieldElement, Vec<Uuid>>,
    records: HashMap<Uuid, AttestationRecord>,
}

/// Thread-safe attestation registry.
#[derive(Default)]
pub struct AttestationRegistry {
    state: RwLock<RegistryState>,
}

impl AttestationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issuer to the authorized set. Idempotent.
    pub fn authorize_issuer(&self, issuer: IssuerId) {
        let mut state = self.state.write();
        if state.issuers.insert(issuer.clone()) {
            tracing::info!(%issuer, "issuer authorized");
        }
    }

    /// Remove an issuer from the authorized set. Idempotent.
    ///
    /// Existing records from the issuer stay in the registry but stop
    /// counting: validity queries report them as
    /// [`Validity::IssuerDeauthorized`].
    pub fn deauthorize_issuer(&self, issuer: &IssuerId) {
        let mut state = self.state.write();
        if state.issuers.remove(issuer) {
            tracing::warn!(%issuer, "issuer deauthorized");
        }
    }

    /// Whether an issuer is currently authorized.
    pub fn is_authorized(&self, issuer: &IssuerId) -> bool {
        self.state.read().issuers.contains(issuer)
    }

    /// Issue an attestation over a commitment.
    ///
    /// # Errors
    ///
    /// - [`AttestError::IssuerNotAuthorized`] for unknown issuers.
    /// - [`AttestError::ExpiryBeforeIssue`] when the expiry is not in the
    ///   future relative to the issue time.
    pub fn issue(
        &self,
        commitment: FieldElement,
        issuer: IssuerId,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AttestationRecord, AttestError> {
        let mut state = self.state.write();
        if !state.issuers.contains(&issuer) {
            return Err(AttestError::IssuerNotAuthorized(issuer));
        }
        let issued_at = Utc::now();
        if let Some(expires_at) = expires_at {
            if expires_at <= issued_at {
                return Err(AttestError::ExpiryBeforeIssue {
                    issued_at,
                    expires_at,
                });
            }
        }
        let record = AttestationRecord {
            id: Uuid::new_v4(),
            commitment,
            issuer,
            issued_at,
            expires_at,
            revoked: false,
            revoked_at: None,
        };
        state
            .by_commitment
            .entry(commitment)
            .or_default()
            .push(record.id);
        state.records.insert(record.id, record.clone());
        tracing::info!(id = %record.id, issuer = %record.issuer, "attestation issued");
        Ok(record)
    }

    /// Revoke an attestation record. Idempotent: revoking an already
    /// revoked record changes nothing and succeeds.
    pub fn revoke(&self, id: Uuid) -> Result<AttestationRecord, AttestError> {
        let mut state = self.state.write();
        let record = state
            .records
            .get_mut(&id)
            .ok_or(AttestError::UnknownRecord(id))?;
        if !record.revoked {
            record.revoked = true;
            record.revoked_at = Some(Utc::now());
            tracing::warn!(%id, issuer = %record.issuer, "attestation revoked");
        }
        Ok(record.clone())
    }

    /// Look up a record by id.
    pub fn record(&self, id: Uuid) -> Option<AttestationRecord> {
        self.state.read().records.get(&id).cloned()
    }

    /// All records for a commitment, in issue order.
    pub fn records_for(&self, commitment: &FieldElement) -> Vec<AttestationRecord> {
        let state = self.state.read();
        state
            .by_commitment
            .get(commitment)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.records.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Judge a commitment's attestation validity as of `now`.
    ///
    /// Valid when any record is unrevoked, unexpired, and from a
    /// currently authorized issuer. Otherwise the reported reason comes
    /// from the most recently issued record, checked revoked, then
    /// issuer authorization, then expiry.
    pub fn validity(&self, commitment: &FieldElement, now: DateTime<Utc>) -> Validity {
        let state = self.state.read();
        let Some(ids) = state.by_commitment.get(commitment) else {
            return Validity::NotAttested;
        };
        let records: Vec<&AttestationRecord> =
            ids.iter().filter_map(|id| state.records.get(id)).collect();
        if records.is_empty() {
            return Validity::NotAttested;
        }
        let live = |r: &&AttestationRecord| {
            !r.revoked && !r.expired_at(now) && state.issuers.contains(&r.issuer)
        };
        if records.iter().any(live) {
            return Validity::Valid;
        }
        // records is non-empty, so max_by_key yields one.
        let newest = records
            .iter()
            .max_by_key(|r| r.issued_at)
            .copied()
            .unwrap_or(records[0]);
        if newest.revoked {
            Validity::Revoked
        } else if !state.issuers.contains(&newest.issuer) {
            Validity::IssuerDeauthorized
        } else {
            Validity::Expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn registry_with_issuer() -> (AttestationRegistry, IssuerId) {
        let registry = AttestationRegistry::new();
        let issuer = IssuerId::from("regulator-1");
        registry.authorize_issuer(issuer.clone());
        (registry, issuer)
    }

    #[test]
    fn unauthorized_issuer_cannot_attest() {
        let registry = AttestationRegistry::new();
        let err = registry
            .issue(FieldElement::from_u64(1), IssuerId::from("rogue"), None)
            .unwrap_err();
        assert!(matches!(err, AttestError::IssuerNotAuthorized(_)));
    }

    #[test]
    fn issued_attestation_is_valid() {
        let (registry, issuer) = registry_with_issuer();
        let commitment = FieldElement::from_u64(42);
        registry.issue(commitment, issuer, None).unwrap();
        assert_eq!(registry.validity(&commitment, Utc::now()), Validity::Valid);
    }

    #[test]
    fn unknown_commitment_is_not_attested() {
        let (registry, _) = registry_with_issuer();
        assert_eq!(
            registry.validity(&FieldElement::from_u64(99), Utc::now()),
            Validity::NotAttested
        );
    }

    #[test]
    fn revocation_is_idempotent_and_preserves_the_record() {
        let (registry, issuer) = registry_with_issuer();
        let commitment = FieldElement::from_u64(42);
        let record = registry.issue(commitment, issuer, None).unwrap();
        let first = registry.revoke(record.id).unwrap();
        let second = registry.revoke(record.id).unwrap();
        assert!(first.revoked);
        assert_eq!(first.revoked_at, second.revoked_at);
        assert_eq!(registry.validity(&commitment, Utc::now()), Validity::Revoked);
        assert!(registry.record(record.id).is_some());
    }

    #[test]
    fn revoking_unknown_record_fails() {
        let (registry, _) = registry_with_issuer();
        let err = registry.revoke(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AttestError::UnknownRecord(_)));
    }

    #[test]
    fn expired_attestation_reports_expired() {
        let (registry, issuer) = registry_with_issuer();
        let commitment = FieldElement::from_u64(42);
        registry
            .issue(commitment, issuer, Some(Utc::now() + Duration::hours(1)))
            .unwrap();
        let later = Utc::now() + Duration::hours(2);
        assert_eq!(registry.validity(&commitment, later), Validity::Expired);
    }

    #[test]
    fn expiry_must_be_in_the_future() {
        let (registry, issuer) = registry_with_issuer();
        let err = registry
            .issue(
                FieldElement::from_u64(1),
                issuer,
                Some(Utc::now() - Duration::seconds(5)),
            )
            .unwrap_err();
        assert!(matches!(err, AttestError::ExpiryBeforeIssue { .. }));
    }

    #[test]
    fn deauthorization_invalidates_existing_records() {
        let (registry, issuer) = registry_with_issuer();
        let commitment = FieldElement::from_u64(42);
        registry.issue(commitment, issuer.clone(), None).unwrap();
        registry.deauthorize_issuer(&issuer);
        assert_eq!(
            registry.validity(&commitment, Utc::now()),
            Validity::IssuerDeauthorized
        );
    }

    #[test]
    fn reauthorization_restores_validity() {
        let (registry, issuer) = registry_with_issuer();
        let commitment = FieldElement::from_u64(42);
        registry.issue(commitment, issuer.clone(), None).unwrap();
        registry.deauthorize_issuer(&issuer);
        registry.authorize_issuer(issuer);
        assert_eq!(registry.validity(&commitment, Utc::now()), Validity::Valid);
    }

    #[test]
    fn any_live_record_wins_over_a_revoked_one() {
        let (registry, issuer) = registry_with_issuer();
        let commitment = FieldElement::from_u64(42);
        let first = registry.issue(commitment, issuer.clone(), None).unwrap();
        registry.revoke(first.id).unwrap();
        registry.issue(commitment, issuer, None).unwrap();
        assert_eq!(registry.validity(&commitment, Utc::now()), Validity::Valid);
        assert_eq!(registry.records_for(&commitment).len(), 2);
    }
}
