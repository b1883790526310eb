//! # Attestation Records
//!
//! An attestation asserts that an authorized issuer vouched for one
//! commitment during a time window. Records are append-only: revocation
//! marks a record, it never deletes it, so an auditor can always see
//! that an attestation existed and when it stopped counting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zkbp_crypto::FieldElement;

/// Opaque identifier of an attestation issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerId(String);

impl IssuerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IssuerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One attestation over one commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Registry-assigned record identifier.
    pub id: Uuid,
    /// The attested commitment.
    pub commitment: FieldElement,
    /// Who vouched for it.
    pub issuer: IssuerId,
    /// When the attestation was issued.
    pub issued_at: DateTime<Utc>,
    /// When it stops counting, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the issuer has withdrawn it.
    pub revoked: bool,
    /// When it was withdrawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AttestationRecord {
    /// Whether the record had expired as of `now`.
    ///
    /// Expiry is exclusive at the boundary: a record expiring exactly at
    /// `now` is already expired.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }
}
