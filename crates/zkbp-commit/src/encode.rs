//! # Payload Field Encodings
//!
//! Each leaf payload type maps to a fixed-length, fixed-order list of
//! field elements. The ordering is part of the commitment contract:
//! changing it changes every commitment, so the orderings below are
//! frozen and the tests pin them.
//!
//! Three encodings exist, chosen per sub-field:
//!
//! - **direct numeric** — machine integers lifted into the field
//!   (`FieldElement::from_u64`); always canonical.
//! - **domain-hash** — strings and identifiers hashed into the field
//!   under a per-position label ([`hash_to_field`]), so equal strings in
//!   different positions cannot alias.
//! - **pass-through** — values that already are field-sized hashes
//!   (document hashes), converted strictly: a byte value at or above the
//!   modulus is an overflow error, never silently reduced.

use zkbp_core::{
    DocumentPayload, OwnershipPayload, RegistrationPayload, RevenuePayload, ZkbpError,
};
use zkbp_crypto::{hash_to_field, FieldElement};

/// Registration encoding:
/// `[H(business_id), H(jurisdiction), H(registration_number), year]`.
pub fn encode_registration(payload: &RegistrationPayload) -> Vec<FieldElement> {
    vec![
        hash_to_field("registration.business_id", &payload.business_id),
        hash_to_field("registration.jurisdiction", &payload.jurisdiction),
        hash_to_field("registration.registration_number", &payload.registration_number),
        FieldElement::from_u64(u64::from(payload.incorporation_year)),
    ]
}

/// Ownership encoding:
/// `[owner_count, H(holder_0), share_0, H(holder_1), share_1, …]`.
///
/// The declared owner order is significant and preserved.
pub fn encode_ownership(payload: &OwnershipPayload) -> Vec<FieldElement> {
    let mut fields = Vec::with_capacity(1 + payload.owners.len() * 2);
    fields.push(FieldElement::from_u64(payload.owners.len() as u64));
    for owner in &payload.owners {
        fields.push(hash_to_field("ownership.holder_id", &owner.holder_id));
        fields.push(FieldElement::from_u64(u64::from(owner.share_bps.bps())));
    }
    fields
}

/// Revenue encoding:
/// `[revenue_amount, threshold, H(currency), H(reporting_period)]`.
pub fn encode_revenue(payload: &RevenuePayload) -> Vec<FieldElement> {
    vec![
        FieldElement::from_u64(payload.revenue_amount),
        FieldElement::from_u64(payload.threshold),
        hash_to_field("revenue.currency", &payload.currency),
        hash_to_field("revenue.reporting_period", &payload.reporting_period),
    ]
}

/// Document encoding: `[document_hash (pass-through), kind_code]`.
///
/// The hash is validated upstream as 64 hex chars; here it must also be
/// a canonical field element.
pub fn encode_document(payload: &DocumentPayload) -> Result<Vec<FieldElement>, ZkbpError> {
    let bytes = decode_hex32(&payload.document_hash)?;
    let hash = FieldElement::from_bytes_strict(&bytes, "document_hash")?;
    Ok(vec![
        hash,
        FieldElement::from_u64(u64::from(payload.doc_kind.code())),
    ])
}

/// Decode a 64-char hex string into 32 bytes.
fn decode_hex32(hex: &str) -> Result<[u8; 32], ZkbpError> {
    if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ZkbpError::Cryptographic(format!(
            "expected 64 hex chars, got \"{}\"",
            &hex[..hex.len().min(80)]
        )));
    }
    let mut bytes = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
        let parse = |b: u8| -> u8 {
            match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                _ => b - b'A' + 10,
            }
        };
        bytes[i] = (parse(chunk[0]) << 4) | parse(chunk[1]);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkbp_core::{DocumentKind, OwnerShare, ShareBps};

    fn registration() -> RegistrationPayload {
        RegistrationPayload {
            business_id: "biz-42".into(),
            jurisdiction: "AE-DXB".into(),
            registration_number: "RN-7".into(),
            incorporation_year: 2019,
        }
    }

    #[test]
    fn registration_ordering_is_pinned() {
        let fields = encode_registration(&registration());
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], hash_to_field("registration.business_id", "biz-42"));
        assert_eq!(fields[3], FieldElement::from_u64(2019));
    }

    #[test]
    fn ownership_preserves_owner_order() {
        let payload = OwnershipPayload {
            owners: vec![
                OwnerShare { holder_id: "alpha".into(), share_bps: ShareBps(6000) },
                OwnerShare { holder_id: "beta".into(), share_bps: ShareBps(4000) },
            ],
        };
        let fields = encode_ownership(&payload);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], FieldElement::from_u64(2));
        assert_eq!(fields[1], hash_to_field("ownership.holder_id", "alpha"));
        assert_eq!(fields[2], FieldElement::from_u64(6000));

        let reversed = OwnershipPayload {
            owners: payload.owners.iter().rev().cloned().collect(),
        };
        assert_ne!(fields, encode_ownership(&reversed));
    }

    #[test]
    fn revenue_ordering_is_pinned() {
        let payload = RevenuePayload {
            revenue_amount: 1_500_000,
            threshold: 1_000_000,
            currency: "USD".into(),
            reporting_period: "2024".into(),
        };
        let fields = encode_revenue(&payload);
        assert_eq!(fields[0], FieldElement::from_u64(1_500_000));
        assert_eq!(fields[1], FieldElement::from_u64(1_000_000));
        assert_eq!(fields[2], hash_to_field("revenue.currency", "USD"));
    }

    #[test]
    fn document_hash_passes_through_strictly() {
        let payload = DocumentPayload {
            document_hash: format!("{:064x}", 0xdeadbeefu64),
            doc_kind: DocumentKind::AuditReport,
        };
        let fields = encode_document(&payload).unwrap();
        assert_eq!(fields[0], FieldElement::from_u64(0xdead_beef));
        assert_eq!(fields[1], FieldElement::from_u64(4));
    }

    #[test]
    fn document_hash_above_modulus_is_overflow() {
        let payload = DocumentPayload {
            document_hash: "ff".repeat(32),
            doc_kind: DocumentKind::Other,
        };
        let err = encode_document(&payload).unwrap_err();
        assert!(matches!(err, ZkbpError::Overflow(_)));
    }

    #[test]
    fn uppercase_hex_is_accepted_for_document_hashes() {
        let payload = DocumentPayload {
            document_hash: format!("{:064X}", 0xabcu64),
            doc_kind: DocumentKind::Other,
        };
        let fields = encode_document(&payload).unwrap();
        assert_eq!(fields[0], FieldElement::from_u64(0xabc));
    }

    #[test]
    fn same_string_in_different_positions_encodes_differently() {
        let fields = encode_registration(&RegistrationPayload {
            business_id: "same".into(),
            jurisdiction: "same".into(),
            registration_number: "same".into(),
            incorporation_year: 2000,
        });
        assert_ne!(fields[0], fields[1]);
        assert_ne!(fields[1], fields[2]);
    }
}
