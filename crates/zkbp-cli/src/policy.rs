//! # Policy Subcommand
//!
//! Decodes a policy mask into its predicate set and slot layout without
//! touching any payload — a quick sanity tool when assembling composite
//! requests by hand.

use clap::Args;
use serde::Serialize;

use zkbp_core::{Policy, Predicate};

/// Arguments for the policy subcommand.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// The policy mask value (decimal, 1–31).
    pub value: u8,
}

#[derive(Debug, Serialize)]
struct SlotLayout {
    slot: usize,
    predicate: Predicate,
}

#[derive(Debug, Serialize)]
struct PolicyReport {
    policy: u8,
    mask: String,
    predicates: Vec<Predicate>,
    slots: Vec<SlotLayout>,
    required_slots: usize,
    wallet_binding: bool,
}

pub fn run(args: &PolicyArgs) -> anyhow::Result<()> {
    let policy = Policy::new(args.value)?;
    let report = PolicyReport {
        policy: policy.bits(),
        mask: format!("0b{:05b}", policy.bits()),
        predicates: policy.enabled_predicates(),
        slots: policy
            .slot_predicates()
            .into_iter()
            .filter_map(|predicate| {
                policy
                    .slot_of(predicate)
                    .map(|slot| SlotLayout { slot, predicate })
            })
            .collect(),
        required_slots: policy.required_slots(),
        wallet_binding: policy.wallet_binding(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
