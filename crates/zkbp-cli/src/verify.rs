//! # Verify Subcommand
//!
//! Runs one request/witness bundle through the verification state
//! machine and prints the outcome as JSON. The process exit code
//! reflects the outcome: 0 for `Verified`, 1 for `Rejected`.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};

use zkbp_crypto::PoseidonHasher;
use zkbp_verify::{VerificationOutcome, VerificationRequest, Verifier, WitnessBundle};

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the JSON verification bundle.
    pub bundle: PathBuf,
}

/// The JSON wire form of one verification attempt: the public request
/// plus the private witnesses the prover opens.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationBundle {
    pub request: VerificationRequest,
    pub witnesses: WitnessBundle,
}

pub fn run(args: &VerifyArgs) -> anyhow::Result<VerificationOutcome> {
    let json = fs::read_to_string(&args.bundle)
        .with_context(|| format!("reading bundle file {}", args.bundle.display()))?;
    let bundle: VerificationBundle =
        serde_json::from_str(&json).context("parsing verification bundle")?;

    let verifier = Verifier::new(PoseidonHasher::new());
    let outcome = verifier.verify(&bundle.request, &bundle.witnesses);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome)
}
