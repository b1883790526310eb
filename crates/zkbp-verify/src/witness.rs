//! # Verification Witnesses
//!
//! The private side of a verification attempt: the payloads and slot
//! salts the prover opens, plus the wallet secret when the binding bit
//! is set. Witnesses travel as JSON for the CLI flow; the wallet secret
//! is zeroized on drop.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use zkbp_core::{
    DocumentPayload, OwnershipPayload, Predicate, RegistrationPayload, RevenuePayload,
};
use zkbp_crypto::{CryptoError, FieldElement};

/// One opened commitment: the payload and the salt it was committed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Witness<P> {
    /// The claimed payload.
    pub payload: P,
    /// The salt the commitment was computed with.
    pub nonce: FieldElement,
}

/// The full private input of one verification attempt. Each field is
/// present exactly when the corresponding policy bit is set; extra
/// witnesses for disabled predicates are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WitnessBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<Witness<RegistrationPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Witness<OwnershipPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Witness<RevenuePayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Witness<DocumentPayload>>,
    /// Wallet secret, required when the binding bit is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_secret: Option<WalletSecret>,
}

impl WitnessBundle {
    /// Whether the witness for a commitment-bearing predicate is present.
    pub fn has(&self, predicate: Predicate) -> bool {
        match predicate {
            Predicate::Registration => self.registration.is_some(),
            Predicate::Ownership => self.ownership.is_some(),
            Predicate::Revenue => self.revenue.is_some(),
            Predicate::Document => self.document.is_some(),
            Predicate::WalletBinding => self.wallet_secret.is_some(),
        }
    }
}

/// A 32-byte wallet secret. Wiped from memory on drop.
///
/// The byte value must be a canonical field element — generation is
/// expected to rejection-sample, the same discipline as nonce drawing.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletSecret {
    bytes: [u8; 32],
}

impl WalletSecret {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parse from 64 hex chars.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let fe = FieldElement::from_hex(hex)?;
        Ok(Self {
            bytes: fe.to_bytes(),
        })
    }

    /// Interpret the secret as a field element, strictly.
    pub fn to_field(&self) -> Result<FieldElement, CryptoError> {
        Ok(FieldElement::from_bytes_strict(
            &self.bytes,
            "wallet secret",
        )?)
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

// No Debug derive: the secret must not leak through logs or panic
// messages.
impl std::fmt::Debug for WalletSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WalletSecret(..)")
    }
}

impl Serialize for WalletSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WalletSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        WalletSecret::from_hex(&hex).map_err(de::Error::custom)
    }
}
