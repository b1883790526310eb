//! # Canonical JSON Bytes
//!
//! [`CanonicalBytes`] is the sole construction path for bytes fed into
//! integrity digest computation. Two callers serializing the same payload
//! must obtain identical bytes, or the auxiliary digest loses its meaning.
//!
//! ## Rules
//!
//! 1. Reject floats outright — every amount in the stack is a scaled
//!    integer, and a float reaching this layer is a caller bug.
//! 2. Object keys sorted lexicographically.
//! 3. Compact separators, no whitespace.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private; the only constructor applies the full
//! rule set. Code cannot accidentally digest ad-hoc `serde_json` output.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to build `CanonicalBytes`; every integrity
    /// digest in the stack flows through here.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let bytes = serialize_sorted(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the value tree and reject any float-typed number.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                // as_f64 always succeeds for an f64-typed number.
                return Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                ));
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
        _ => Ok(()),
    }
}

/// Serialize with lexicographically sorted keys and compact separators.
fn serialize_sorted(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let sorted = sort_keys(value.clone());
    Ok(serde_json::to_vec(&sorted)?)
}

/// Recursively rebuild objects in sorted-key order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::new();
            for (k, v) in entries {
                out.insert(k, sort_keys(v));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
