//! # BN254 Scalar Field Elements
//!
//! [`FieldElement`] wraps `ark_bn254::Fr`, the 254-bit prime field that
//! commitment hashing operates in. The wire form is fixed-width 64-char
//! lowercase hex (32 bytes, big-endian).
//!
//! ## Conversion Discipline
//!
//! Two byte→field paths exist, and they are not interchangeable:
//!
//! - [`FieldElement::from_bytes_strict`] rejects values >= modulus. Used
//!   wherever the caller supplied an exact value (document hashes, hex
//!   nonces, wallet secrets) — silent reduction would let two distinct
//!   inputs alias to one commitment input.
//! - [`FieldElement::from_bytes_reduce`] reduces modulo the field order.
//!   Used only for domain-hash outputs, where the 2^-98 bias of reducing
//!   a 256-bit digest is negligible and there is no caller value to alias.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

use zkbp_core::OverflowError;

use crate::error::CryptoError;

/// The BN254 scalar field modulus, decimal form. The prime every
/// commitment, nonce, and binding value lives under.
pub const MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Byte width of the fixed wire encoding.
pub const FIELD_BYTES: usize = 32;

/// Separator between the domain label and the value in domain hashing.
const DOMAIN_SEPARATOR: u8 = 0x1f;

/// Prefix namespacing every domain hash this stack produces.
const DOMAIN_PREFIX: &[u8] = b"zkbp.domain/";

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity — also the "empty slot" marker in composite
    /// commitments.
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.0 == Fr::from(0u64)
    }

    /// Lift a machine integer into the field. Always canonical: every
    /// `u64` is far below the 254-bit modulus.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Interpret 32 big-endian bytes as a field element, rejecting
    /// non-canonical values (>= modulus).
    pub fn from_bytes_strict(bytes: &[u8; FIELD_BYTES], context: &str) -> Result<Self, OverflowError> {
        let candidate = Fr::from_be_bytes_mod_order(bytes);
        // Round-tripping detects reduction: a canonical value re-serializes
        // to the original bytes, a reduced one does not.
        let canonical = Self(candidate).to_bytes();
        if &canonical != bytes {
            return Err(OverflowError::ExceedsFieldModulus {
                context: context.to_string(),
            });
        }
        Ok(Self(candidate))
    }

    /// Reduce arbitrary big-endian bytes modulo the field order.
    pub fn from_bytes_reduce(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Fixed-width big-endian byte encoding.
    pub fn to_bytes(&self) -> [u8; FIELD_BYTES] {
        let vec = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; FIELD_BYTES];
        // to_bytes_be yields exactly 32 bytes for a 4-limb field.
        out.copy_from_slice(&vec);
        out
    }

    /// Fixed-width 64-char lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        self.to_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse the fixed-width hex wire form, strictly.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        if hex.len() != FIELD_BYTES * 2 {
            return Err(CryptoError::InvalidHex {
                value: truncate_for_display(hex),
                reason: format!("expected {} chars, got {}", FIELD_BYTES * 2, hex.len()),
            });
        }
        let mut bytes = [0u8; FIELD_BYTES];
        for (i, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
            let hi = hex_nibble(chunk[0]).ok_or_else(|| bad_digit(hex))?;
            let lo = hex_nibble(chunk[1]).ok_or_else(|| bad_digit(hex))?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self::from_bytes_strict(&bytes, "hex field element")?)
    }

    /// Access the inner arkworks element for field arithmetic.
    pub(crate) fn inner(&self) -> Fr {
        self.0
    }

    /// Wrap an arkworks element.
    pub(crate) fn from_inner(fr: Fr) -> Self {
        Self(fr)
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn bad_digit(hex: &str) -> CryptoError {
    CryptoError::InvalidHex {
        value: truncate_for_display(hex),
        reason: "non-hex digit".to_string(),
    }
}

fn truncate_for_display(value: &str) -> String {
    const MAX: usize = 80;
    if value.len() <= MAX {
        value.to_string()
    } else {
        format!("{}…", &value[..MAX])
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement(0x{})", self.to_hex())
    }
}

impl std::fmt::Display for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        FieldElement::from_hex(&hex).map_err(de::Error::custom)
    }
}

/// Map a labelled string into the field via a domain-separated SHA-256.
///
/// The label namespaces the field within its payload type, so equal
/// string values in different positions hash to unrelated elements.
pub fn hash_to_field(label: &str, value: &str) -> FieldElement {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_PREFIX);
    hasher.update(label.as_bytes());
    hasher.update([DOMAIN_SEPARATOR]);
    hasher.update(value.as_bytes());
    FieldElement::from_bytes_reduce(&hasher.finalize())
}
