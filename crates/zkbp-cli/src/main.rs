//! # zkbp CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zkbp_verify::VerificationOutcome;

/// Zero-Knowledge Business Passport toolchain.
///
/// Computes Poseidon commitments over compliance payloads, verifies
/// policy-gated request/witness bundles, and inspects policy masks.
#[derive(Parser, Debug)]
#[command(name = "zkbp", version, about)]
struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compute a commitment over a JSON payload file.
    Commit(zkbp_cli::commit::CommitArgs),
    /// Verify a request/witness bundle.
    Verify(zkbp_cli::verify::VerifyArgs),
    /// Decode a policy mask into its slot layout.
    Policy(zkbp_cli::policy::PolicyArgs),
}

/// Map repeated `-v` flags onto the default filter directive.
fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = default_log_level(cli.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match cli.command {
        Commands::Commit(args) => zkbp_cli::commit::run(&args),
        Commands::Verify(args) => {
            return match zkbp_cli::verify::run(&args) {
                Ok(VerificationOutcome::Verified) => ExitCode::SUCCESS,
                Ok(VerificationOutcome::Rejected(_)) => ExitCode::FAILURE,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::FAILURE
                }
            };
        }
        Commands::Policy(args) => zkbp_cli::policy::run(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default_with_one_step_per_flag() {
        assert_eq!(default_log_level(0), "warn");
        assert_eq!(default_log_level(1), "info");
        assert_eq!(default_log_level(2), "debug");
        assert_eq!(default_log_level(3), "trace");
        assert_eq!(default_log_level(10), "trace");
    }
}
