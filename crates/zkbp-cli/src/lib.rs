//! # zkbp-cli — Business Passport Command-Line Interface
//!
//! Thin front-end over the domain crates. Each subcommand module owns
//! its clap `Args` struct and a `run` function returning
//! `anyhow::Result`; all domain logic lives in `zkbp-commit` and
//! `zkbp-verify`.
//!
//! ## Subcommands
//!
//! - `commit` — compute a commitment over a JSON payload file
//! - `verify` — run a request/witness bundle through the verifier
//! - `policy` — decode a policy mask into its slot layout
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no protocol logic here.
//! - JSON output only, one object per invocation, so scripts can pipe it.

pub mod commit;
pub mod policy;
pub mod verify;
