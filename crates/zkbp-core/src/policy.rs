//! # Policy Bitmask
//!
//! A [`Policy`] is an integer bitmask with 5 significant bits, each
//! enabling one compliance predicate. A composite proof binds ten fixed
//! commitment slots; each commitment-bearing predicate (bits 0–3) owns
//! the slot at its own bit index — registration is always slot 0,
//! ownership slot 1, revenue slot 2, document slot 3 — and every other
//! slot (disabled predicates and slots 4–9) must hold the zero field
//! element. The layout is position-stable: enabling or disabling one
//! predicate never moves another predicate's slot.
//!
//! Bit 4 (wallet binding) enables the nonce/wallet binding check and
//! occupies no commitment slot.
//!
//! ## Invariant
//!
//! A policy value must lie in `[1, 31]`. Zero (no checks at all) is
//! invalid, as is any value with bits above bit 4 set. The raw value is
//! preserved through deserialization so that validation can report the
//! range violation alongside everything else the caller got wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid policy value (at least one predicate enabled).
pub const POLICY_MIN: u8 = 1;

/// Maximum valid policy value (all five predicates enabled).
pub const POLICY_MAX: u8 = 31;

/// Number of fixed commitment slots in a composite proof.
pub const COMMITMENT_SLOTS: usize = 10;

/// Policy construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy value is outside `[1, 31]`.
    #[error("policy value {0} outside valid range [{POLICY_MIN}, {POLICY_MAX}]")]
    OutOfRange(u8),
}

/// One compliance predicate, in fixed ascending bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Business registration status (bit 0).
    Registration,
    /// Ownership / Ultimate Beneficial Owner structure (bit 1).
    Ownership,
    /// Revenue threshold (bit 2).
    Revenue,
    /// Document possession (bit 3).
    Document,
    /// Wallet binding (bit 4) — no commitment slot.
    WalletBinding,
}

impl Predicate {
    /// All predicates in ascending bit order.
    pub const ALL: [Predicate; 5] = [
        Predicate::Registration,
        Predicate::Ownership,
        Predicate::Revenue,
        Predicate::Document,
        Predicate::WalletBinding,
    ];

    /// The commitment-bearing predicates (those that occupy a slot).
    pub const COMMITMENT_BEARING: [Predicate; 4] = [
        Predicate::Registration,
        Predicate::Ownership,
        Predicate::Revenue,
        Predicate::Document,
    ];

    /// The bitmask bit for this predicate.
    pub fn bit(self) -> u8 {
        match self {
            Predicate::Registration => 1 << 0,
            Predicate::Ownership => 1 << 1,
            Predicate::Revenue => 1 << 2,
            Predicate::Document => 1 << 3,
            Predicate::WalletBinding => 1 << 4,
        }
    }

    /// Stable lowercase name, matching the JSON tag vocabulary.
    pub fn name(self) -> &'static str {
        match self {
            Predicate::Registration => "registration",
            Predicate::Ownership => "ownership",
            Predicate::Revenue => "revenue",
            Predicate::Document => "document",
            Predicate::WalletBinding => "wallet_binding",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The 5-bit predicate selection bitmask.
///
/// Carries the raw value as supplied by the caller; [`Policy::new`]
/// enforces the range invariant, while [`Policy::from_raw`] defers it to
/// [`Policy::check`] so that collect-all validation can report it as one
/// violation among many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policy(u8);

impl Policy {
    /// Construct a policy, enforcing the `[1, 31]` range invariant.
    pub fn new(bits: u8) -> Result<Self, PolicyError> {
        let policy = Self(bits);
        policy.check()?;
        Ok(policy)
    }

    /// Construct without range checking. The value is validated by
    /// [`Policy::check`] wherever the policy is actually used.
    pub fn from_raw(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw bitmask value.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Enforce the range invariant.
    pub fn check(self) -> Result<(), PolicyError> {
        if self.0 < POLICY_MIN || self.0 > POLICY_MAX {
            return Err(PolicyError::OutOfRange(self.0));
        }
        Ok(())
    }

    /// Whether the given predicate bit is set.
    pub fn enables(self, predicate: Predicate) -> bool {
        self.0 & predicate.bit() != 0
    }

    /// Every enabled predicate, in ascending bit order.
    pub fn enabled_predicates(self) -> Vec<Predicate> {
        Predicate::ALL
            .into_iter()
            .filter(|p| self.enables(*p))
            .collect()
    }

    /// The enabled commitment-bearing predicates, in ascending bit order.
    pub fn slot_predicates(self) -> Vec<Predicate> {
        Predicate::COMMITMENT_BEARING
            .into_iter()
            .filter(|p| self.enables(*p))
            .collect()
    }

    /// How many of the ten commitment slots must be populated.
    pub fn required_slots(self) -> usize {
        self.slot_predicates().len()
    }

    /// The fixed slot index of a commitment-bearing predicate, if
    /// enabled. The slot is the predicate's own bit index, so it never
    /// depends on which other predicates the policy enables.
    pub fn slot_of(self, predicate: Predicate) -> Option<usize> {
        match predicate {
            Predicate::WalletBinding => None,
            p if self.enables(p) => Some(p.bit().trailing_zeros() as usize),
            _ => None,
        }
    }

    /// Whether the wallet-binding check is requested.
    pub fn wallet_binding(self) -> bool {
        self.enables(Predicate::WalletBinding)
    }
}

impl TryFrom<u8> for Policy {
    type Error = PolicyError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Policy::new(bits)
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.enabled_predicates().iter().map(|p| p.name()).collect();
        write!(f, "0b{:05b} ({})", self.0, names.join(", "))
    }
}
