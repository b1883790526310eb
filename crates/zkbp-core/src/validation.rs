//! # Collect-All Validation
//!
//! Structural and range validation for caller-supplied payloads. Every
//! rule is checked and every violation recorded — validation never
//! short-circuits, so one round trip surfaces the complete problem list.
//!
//! Validation is pure: no I/O, no shared state, no side effects. The
//! result is a [`ValidationReport`], which doubles as the error payload
//! of [`ZkbpError::Validation`][crate::ZkbpError::Validation].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::{
    CommitmentPayload, CompositePayload, DocumentPayload, OwnershipPayload, RegistrationPayload,
    RevenuePayload, MAX_OWNERS, REVENUE_CAP, REVENUE_MIN, SHARE_SCALE_BPS,
    SHARE_SUM_TOLERANCE_BPS,
};
use crate::policy::{Predicate, POLICY_MAX, POLICY_MIN};

/// Bounds on the incorporation year, generous on both ends.
const MIN_INCORPORATION_YEAR: u16 = 1800;
const MAX_INCORPORATION_YEAR: u16 = 2200;

/// Maximum accepted length for free-form identifier strings.
const MAX_IDENTIFIER_LEN: usize = 256;

/// Expected hex width of a SHA-256 document hash or field-element nonce.
const HEX_WIDTH: usize = 64;

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path of the offending field (`"owners[2].share_bps"`).
    pub field: String,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl Violation {
    /// Create a violation for the given field path.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The structured result of validating one payload: every violated rule,
/// in declaration order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[error("{} violation(s): {}", .violations.len(), .violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationReport {
    /// Every violated rule, ordered by rule declaration.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// An empty (passing) report.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a report from a violation list.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Whether the payload passed every rule.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Record a violation.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }

    /// Merge another report under a field-path prefix.
    pub fn absorb(&mut self, prefix: &str, other: ValidationReport) {
        for v in other.violations {
            self.violations.push(Violation::new(
                format!("{prefix}.{}", v.field),
                v.message,
            ));
        }
    }

    /// Convert a passing report to `Ok(())`, a failing one to `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Payload types that can be validated without side effects.
pub trait Validate {
    /// Check every rule and return the full violation list.
    fn validate(&self) -> ValidationReport;
}

fn check_identifier(report: &mut ValidationReport, field: &str, value: &str) {
    if value.is_empty() {
        report.push(field, "must be non-empty");
    } else if value.len() > MAX_IDENTIFIER_LEN {
        report.push(
            field,
            format!("must be at most {MAX_IDENTIFIER_LEN} bytes"),
        );
    }
}

fn check_amount(report: &mut ValidationReport, field: &str, value: u64) {
    if value < REVENUE_MIN {
        report.push(field, format!("must be at least {REVENUE_MIN} currency unit"));
    }
    if value > REVENUE_CAP {
        report.push(field, format!("must not exceed {REVENUE_CAP} currency units"));
    }
}

impl Validate for RegistrationPayload {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::empty();
        check_identifier(&mut report, "business_id", &self.business_id);
        check_identifier(&mut report, "jurisdiction", &self.jurisdiction);
        check_identifier(&mut report, "registration_number", &self.registration_number);
        if !(MIN_INCORPORATION_YEAR..=MAX_INCORPORATION_YEAR).contains(&self.incorporation_year) {
            report.push(
                "incorporation_year",
                format!(
                    "must be within [{MIN_INCORPORATION_YEAR}, {MAX_INCORPORATION_YEAR}], got {}",
                    self.incorporation_year
                ),
            );
        }
        report
    }
}

impl Validate for OwnershipPayload {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::empty();
        if self.owners.is_empty() {
            report.push("owners", "must declare at least one owner");
        }
        if self.owners.len() > MAX_OWNERS {
            report.push(
                "owners",
                format!("must declare at most {MAX_OWNERS} owners, got {}", self.owners.len()),
            );
        }
        for (i, owner) in self.owners.iter().enumerate() {
            check_identifier(&mut report, &format!("owners[{i}].holder_id"), &owner.holder_id);
            let bps = owner.share_bps.bps();
            if bps == 0 || bps > SHARE_SCALE_BPS {
                report.push(
                    format!("owners[{i}].share_bps"),
                    format!("must be within (0, {SHARE_SCALE_BPS}] basis points, got {bps}"),
                );
            }
        }
        // Sum check runs even when individual shares are out of range, so
        // the caller sees the whole picture at once.
        if !self.owners.is_empty() {
            let total = self.total_bps();
            let lo = u64::from(SHARE_SCALE_BPS - SHARE_SUM_TOLERANCE_BPS);
            let hi = u64::from(SHARE_SCALE_BPS + SHARE_SUM_TOLERANCE_BPS);
            if !(lo..=hi).contains(&total) {
                report.push(
                    "owners",
                    format!(
                        "shares must sum to 100% within ±{SHARE_SUM_TOLERANCE_BPS} bp, got {total} bp"
                    ),
                );
            }
        }
        report
    }
}

impl Validate for RevenuePayload {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::empty();
        check_amount(&mut report, "revenue_amount", self.revenue_amount);
        check_amount(&mut report, "threshold", self.threshold);
        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            report.push(
                "currency",
                format!("must be a 3-letter uppercase code, got \"{}\"", self.currency),
            );
        }
        check_identifier(&mut report, "reporting_period", &self.reporting_period);
        report
    }
}

impl Validate for DocumentPayload {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::empty();
        check_hex_exact(&mut report, "document_hash", &self.document_hash);
        // doc_kind is range-enforced by its deserializer; nothing to add.
        report
    }
}

impl Validate for CompositePayload {
    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::empty();
        let bits = self.policy.bits();
        if bits < POLICY_MIN || bits > POLICY_MAX {
            report.push(
                "policy",
                format!("must be within [{POLICY_MIN}, {POLICY_MAX}], got {bits}"),
            );
        }
        for predicate in Predicate::COMMITMENT_BEARING {
            let enabled = self.policy.enables(predicate);
            let present = self.has(predicate);
            match (enabled, present) {
                (true, false) => report.push(
                    predicate.name(),
                    "payload required by policy but missing",
                ),
                (false, true) => report.push(
                    predicate.name(),
                    "payload supplied for a predicate the policy disables",
                ),
                _ => {}
            }
        }
        if let Some(p) = &self.registration {
            report.absorb("registration", p.validate());
        }
        if let Some(p) = &self.ownership {
            report.absorb("ownership", p.validate());
        }
        if let Some(p) = &self.revenue {
            report.absorb("revenue", p.validate());
        }
        if let Some(p) = &self.document {
            report.absorb("document", p.validate());
        }
        report
    }
}

impl Validate for CommitmentPayload {
    fn validate(&self) -> ValidationReport {
        match self {
            CommitmentPayload::Registration(p) => p.validate(),
            CommitmentPayload::Ownership(p) => p.validate(),
            CommitmentPayload::Revenue(p) => p.validate(),
            CommitmentPayload::Document(p) => p.validate(),
            CommitmentPayload::Composite(p) => p.validate(),
        }
    }
}

fn check_hex_exact(report: &mut ValidationReport, field: &str, value: &str) {
    if value.is_empty() {
        report.push(field, "must be non-empty");
        return;
    }
    if value.len() != HEX_WIDTH {
        report.push(
            field,
            format!("must be exactly {HEX_WIDTH} hex chars, got {}", value.len()),
        );
    }
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        report.push(field, "must contain only hex digits");
    }
}

/// Validate a caller-supplied nonce in its hex wire form: present,
/// fixed-width hex, and not the zero element.
pub fn validate_nonce_hex(nonce: Option<&str>) -> ValidationReport {
    let mut report = ValidationReport::empty();
    match nonce {
        None => report.push("nonce", "must be present"),
        Some(value) => {
            check_hex_exact(&mut report, "nonce", value);
            if report.is_valid() && value.bytes().all(|b| b == b'0') {
                report.push("nonce", "must be non-zero");
            }
        }
    }
    report
}
