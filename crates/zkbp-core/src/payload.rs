//! # Commitment Payload Taxonomy
//!
//! The five commitment categories as a closed tagged union. The JSON wire
//! form uses an internal `"type"` discriminator:
//!
//! ```json
//! { "type": "revenue",
//!   "revenue_amount": 1500000,
//!   "threshold": 1000000,
//!   "currency": "USD",
//!   "reporting_period": "2024" }
//! ```
//!
//! ## Fixed-Point Conventions
//!
//! - Monetary amounts are whole currency units (`u64`, scale 1). The
//!   declared range is `[REVENUE_MIN, REVENUE_CAP]`.
//! - Ownership shares are [`ShareBps`] — basis points of the whole
//!   (1 bp = 0.01 %), so 100 % is exactly `SHARE_SCALE_BPS` = 10 000.
//!
//! Range enforcement lives in [`crate::validation`], which collects every
//! violation; the types here stay constructible so a malformed payload can
//! be fully diagnosed in one pass.

use serde::{Deserialize, Serialize};

use crate::policy::{Policy, Predicate};

/// Minimum revenue figure: one whole currency unit.
pub const REVENUE_MIN: u64 = 1;

/// Declared upper cap on revenue figures (whole currency units).
pub const REVENUE_CAP: u64 = 1_000_000_000_000;

/// 100 % in basis points.
pub const SHARE_SCALE_BPS: u32 = 10_000;

/// Tolerance on the ownership share sum: ±0.01 of the whole (±100 bp),
/// so 99.98 % and 100.02 % are accepted while 95 % is rejected.
pub const SHARE_SUM_TOLERANCE_BPS: u32 = 100;

/// Maximum number of declared owners in a UBO structure.
pub const MAX_OWNERS: usize = 8;

/// An ownership share in basis points (1 bp = 0.01 %).
///
/// Fixed-point by construction — there is no float anywhere in the share
/// pipeline. A share of 25.5 % is `ShareBps(2550)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareBps(pub u32);

impl ShareBps {
    /// The raw basis-point value.
    pub fn bps(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ShareBps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Discriminator for the five commitment categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentKind {
    /// Business registration facts.
    Registration,
    /// Ownership / UBO structure.
    Ownership,
    /// Revenue figure against a threshold.
    Revenue,
    /// Possession of an audited document.
    Document,
    /// Policy-selected composite of the above.
    Composite,
}

impl CommitmentKind {
    /// Stable lowercase name matching the JSON `"type"` tag.
    pub fn name(self) -> &'static str {
        match self {
            CommitmentKind::Registration => "registration",
            CommitmentKind::Ownership => "ownership",
            CommitmentKind::Revenue => "revenue",
            CommitmentKind::Document => "document",
            CommitmentKind::Composite => "composite",
        }
    }
}

impl std::fmt::Display for CommitmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Business registration facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    /// Stable business identifier within the registry of record.
    pub business_id: String,
    /// Jurisdiction code of the registry (e.g. `"AE-DXB"`).
    pub jurisdiction: String,
    /// Registration number issued by the registry.
    pub registration_number: String,
    /// Year of incorporation.
    pub incorporation_year: u16,
}

/// One declared owner and their share of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerShare {
    /// Stable identifier for the holder (natural person or entity).
    pub holder_id: String,
    /// Ownership share in basis points.
    pub share_bps: ShareBps,
}

/// Ownership / Ultimate Beneficial Owner structure.
///
/// The owner list order is significant: it is the encoding order for the
/// commitment, so two payloads with the same owners in different order
/// commit to different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipPayload {
    /// Declared owners, most senior first. Shares must sum to 100 %
    /// within `SHARE_SUM_TOLERANCE_BPS`.
    pub owners: Vec<OwnerShare>,
}

impl OwnershipPayload {
    /// Sum of all declared shares in basis points.
    pub fn total_bps(&self) -> u64 {
        self.owners.iter().map(|o| u64::from(o.share_bps.bps())).sum()
    }
}

/// Revenue figure against a compliance threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenuePayload {
    /// Reported revenue in whole currency units.
    pub revenue_amount: u64,
    /// Threshold the revenue is measured against, same units.
    pub threshold: u64,
    /// ISO 4217 style currency code (`"USD"`).
    pub currency: String,
    /// Reporting period label (`"2024"`, `"2024-Q3"`).
    pub reporting_period: String,
}

/// Document kind codes, matching the audited-document taxonomy of the
/// attestation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DocumentKind {
    /// Incorporation certificate (code 1).
    IncorporationCert,
    /// Business license (code 2).
    BusinessLicense,
    /// Tax certificate (code 3).
    TaxCertificate,
    /// Audit report (code 4).
    AuditReport,
    /// Financial statement (code 5).
    FinancialStatement,
    /// Compliance certificate (code 6).
    ComplianceCert,
    /// Registration form (code 7).
    RegistrationForm,
    /// Identity document (code 8).
    IdentityDocument,
    /// Ownership proof (code 9).
    OwnershipProof,
    /// Anything else (code 99).
    Other,
}

impl DocumentKind {
    /// The numeric code carried into the commitment encoding.
    pub fn code(self) -> u8 {
        match self {
            DocumentKind::IncorporationCert => 1,
            DocumentKind::BusinessLicense => 2,
            DocumentKind::TaxCertificate => 3,
            DocumentKind::AuditReport => 4,
            DocumentKind::FinancialStatement => 5,
            DocumentKind::ComplianceCert => 6,
            DocumentKind::RegistrationForm => 7,
            DocumentKind::IdentityDocument => 8,
            DocumentKind::OwnershipProof => 9,
            DocumentKind::Other => 99,
        }
    }
}

impl From<DocumentKind> for u8 {
    fn from(kind: DocumentKind) -> u8 {
        kind.code()
    }
}

impl TryFrom<u8> for DocumentKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(DocumentKind::IncorporationCert),
            2 => Ok(DocumentKind::BusinessLicense),
            3 => Ok(DocumentKind::TaxCertificate),
            4 => Ok(DocumentKind::AuditReport),
            5 => Ok(DocumentKind::FinancialStatement),
            6 => Ok(DocumentKind::ComplianceCert),
            7 => Ok(DocumentKind::RegistrationForm),
            8 => Ok(DocumentKind::IdentityDocument),
            9 => Ok(DocumentKind::OwnershipProof),
            99 => Ok(DocumentKind::Other),
            other => Err(format!("unknown document kind code: {other}")),
        }
    }
}

/// Possession of an audited document, identified by its SHA-256 hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// SHA-256 of the normalized document, 64 hex chars. The byte value
    /// must also be a canonical field element (< modulus).
    pub document_hash: String,
    /// Document kind code.
    pub doc_kind: DocumentKind,
}

/// Policy-selected composite of the four leaf categories.
///
/// Every predicate enabled by the policy must carry its payload; disabled
/// predicates must be absent. The wallet-binding bit has no payload here —
/// binding is checked at verification time against the request nonce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePayload {
    /// Which predicates this composite must satisfy.
    pub policy: Policy,
    /// Registration sub-payload (policy bit 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationPayload>,
    /// Ownership sub-payload (policy bit 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<OwnershipPayload>,
    /// Revenue sub-payload (policy bit 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenuePayload>,
    /// Document sub-payload (policy bit 3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentPayload>,
}

impl CompositePayload {
    /// Whether the sub-payload for a commitment-bearing predicate is present.
    pub fn has(&self, predicate: Predicate) -> bool {
        match predicate {
            Predicate::Registration => self.registration.is_some(),
            Predicate::Ownership => self.ownership.is_some(),
            Predicate::Revenue => self.revenue.is_some(),
            Predicate::Document => self.document.is_some(),
            Predicate::WalletBinding => false,
        }
    }
}

/// A discriminated commitment payload — the single input type of
/// commitment computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommitmentPayload {
    /// Business registration facts.
    Registration(RegistrationPayload),
    /// Ownership / UBO structure.
    Ownership(OwnershipPayload),
    /// Revenue against a threshold.
    Revenue(RevenuePayload),
    /// Audited document possession.
    Document(DocumentPayload),
    /// Policy-selected composite.
    Composite(CompositePayload),
}

impl CommitmentPayload {
    /// The category discriminator.
    pub fn kind(&self) -> CommitmentKind {
        match self {
            CommitmentPayload::Registration(_) => CommitmentKind::Registration,
            CommitmentPayload::Ownership(_) => CommitmentKind::Ownership,
            CommitmentPayload::Revenue(_) => CommitmentKind::Revenue,
            CommitmentPayload::Document(_) => CommitmentKind::Document,
            CommitmentPayload::Composite(_) => CommitmentKind::Composite,
        }
    }

    /// Parse a payload from its JSON wire form.
    ///
    /// An unknown `"type"` tag surfaces as
    /// [`ZkbpError::UnsupportedType`][crate::ZkbpError::UnsupportedType]
    /// rather than a generic JSON error, so callers can distinguish "you
    /// invented a commitment category" from "your JSON is malformed".
    pub fn from_json(json: &str) -> Result<Self, crate::ZkbpError> {
        // Pull the tag out first: serde reports unknown variants with a
        // message that is awkward to pattern-match reliably.
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| crate::ZkbpError::UnsupportedType("<missing type tag>".to_string()))?;
        const KNOWN: [&str; 5] = ["registration", "ownership", "revenue", "document", "composite"];
        if !KNOWN.contains(&tag) {
            return Err(crate::ZkbpError::UnsupportedType(tag.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}
