//! # Commit Subcommand
//!
//! Computes a commitment over a JSON payload file and prints the bundle
//! as JSON: commitment and nonce as fixed-width hex, plus the SHA-256
//! integrity digest.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use zkbp_commit::{compute_commitment, compute_commitment_with_nonce, CommitmentOutput};
use zkbp_core::{validate_nonce_hex, CommitmentPayload};
use zkbp_crypto::{FieldElement, OsNonceSource, PoseidonHasher};

/// Arguments for the commit subcommand.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Path to the JSON payload file (`"type"`-tagged).
    pub payload: PathBuf,

    /// Recompute under a fixed nonce (64 hex chars) instead of drawing
    /// a fresh one. Leaf payloads only.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Write the output bundle here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &CommitArgs) -> anyhow::Result<()> {
    let json = fs::read_to_string(&args.payload)
        .with_context(|| format!("reading payload file {}", args.payload.display()))?;
    let payload = CommitmentPayload::from_json(&json)?;
    tracing::debug!(kind = %payload.kind(), "loaded payload");

    let hasher = PoseidonHasher::new();
    let output = match &args.nonce {
        Some(hex) => {
            validate_nonce_hex(Some(hex))
                .into_result()
                .map_err(zkbp_core::ZkbpError::Validation)?;
            let nonce = FieldElement::from_hex(hex).context("parsing --nonce")?;
            CommitmentOutput::Single(compute_commitment_with_nonce(&hasher, &payload, nonce)?)
        }
        None => {
            let mut source = OsNonceSource;
            compute_commitment(&hasher, &mut source, &payload)?
        }
    };

    let rendered = serde_json::to_string_pretty(&output)?;
    match &args.out {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("writing output to {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn payload_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn commit_writes_a_parseable_bundle() {
        let payload = payload_file(
            r#"{"type":"revenue","revenue_amount":1500000,"threshold":1000000,"currency":"USD","reporting_period":"2024"}"#,
        );
        let out = tempfile::NamedTempFile::new().unwrap();
        let args = CommitArgs {
            payload: payload.path().to_path_buf(),
            nonce: Some(format!("{:064x}", 0x5eedu64)),
            out: Some(out.path().to_path_buf()),
        };
        run(&args).unwrap();

        let written = fs::read_to_string(out.path()).unwrap();
        let output: CommitmentOutput = serde_json::from_str(&written).unwrap();
        let CommitmentOutput::Single(bundle) = output else {
            panic!("leaf payload produces a single bundle");
        };
        assert_eq!(bundle.nonce, FieldElement::from_u64(0x5eed));
    }

    #[test]
    fn unknown_payload_type_fails() {
        let payload = payload_file(r#"{"type":"payroll"}"#);
        let args = CommitArgs {
            payload: payload.path().to_path_buf(),
            nonce: None,
            out: None,
        };
        assert!(run(&args).is_err());
    }
}
