//! # Poseidon Sponge Hasher
//!
//! A SNARK-friendly hash over the BN254 scalar field, used for every
//! commitment and wallet-binding value in the stack. Width t = 3
//! (rate 2, capacity 1), x^5 S-box, 8 full and 57 partial rounds — the
//! standard parameterization for 128-bit security at this field size.
//!
//! ## Parameter Derivation
//!
//! Round constants are derived by counter-mode SHA-256 over a fixed
//! nothing-up-my-sleeve tag, reduced into the field. The MDS matrix is a
//! 3×3 Cauchy matrix over disjoint constant sequences, which is always
//! invertible. Both derivations are deterministic, so every
//! `PoseidonHasher` instance computes the identical function; the
//! parameter tag is versioned so a future parameter change cannot
//! silently alias old commitments.
//!
//! ## No Hidden State
//!
//! The hasher is explicitly constructed and passed into each computation
//! call. There is deliberately no process-wide lazy singleton: parameter
//! ownership is visible at every call site and tests can construct their
//! own instances freely.

use ark_bn254::Fr;
use ark_ff::Field;
use sha2::{Digest, Sha256};

use crate::field::FieldElement;

/// Sponge state width.
pub const STATE_WIDTH: usize = 3;

/// Elements absorbed per permutation.
pub const RATE: usize = 2;

/// Number of full rounds (S-box on the whole state).
pub const FULL_ROUNDS: usize = 8;

/// Number of partial rounds (S-box on the first element only).
pub const PARTIAL_ROUNDS: usize = 57;

const TOTAL_ROUNDS: usize = FULL_ROUNDS + PARTIAL_ROUNDS;

/// Versioned nothing-up-my-sleeve tag seeding the parameter derivation.
const PARAMETER_TAG: &str = "zkbp.poseidon.bn254.t3.v1";

/// The Poseidon permutation with its derived parameters.
///
/// Construction is cheap enough to do per-request but callers are
/// expected to build one and share it (`&PoseidonHasher` is `Send + Sync`).
#[derive(Clone)]
pub struct PoseidonHasher {
    round_constants: Vec<[Fr; STATE_WIDTH]>,
    mds: [[Fr; STATE_WIDTH]; STATE_WIDTH],
    domain_iv: Fr,
}

impl std::fmt::Debug for PoseidonHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseidonHasher")
            .field("tag", &PARAMETER_TAG)
            .field("rounds", &TOTAL_ROUNDS)
            .finish()
    }
}

impl PoseidonHasher {
    /// Derive the full parameter set from the versioned tag.
    pub fn new() -> Self {
        let round_constants = (0..TOTAL_ROUNDS)
            .map(|round| {
                [
                    derive_constant("rc", round, 0),
                    derive_constant("rc", round, 1),
                    derive_constant("rc", round, 2),
                ]
            })
            .collect();
        Self {
            round_constants,
            mds: cauchy_mds(),
            domain_iv: derive_constant("iv", 0, 0),
        }
    }

    /// Hash an ordered sequence of field elements to a single element.
    ///
    /// The input length is bound into the capacity element, so prefixes
    /// of a longer input can never collide with the shorter input itself.
    pub fn hash(&self, inputs: &[FieldElement]) -> FieldElement {
        let mut state = [Fr::from(0u64), Fr::from(0u64), self.iv(inputs.len())];
        if inputs.is_empty() {
            self.permute(&mut state);
            return FieldElement::from_inner(state[0]);
        }
        for chunk in inputs.chunks(RATE) {
            state[0] += chunk[0].inner();
            if let Some(second) = chunk.get(1) {
                state[1] += second.inner();
            }
            self.permute(&mut state);
        }
        FieldElement::from_inner(state[0])
    }

    /// Hash exactly two elements — the wallet-binding shape.
    pub fn hash_pair(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        self.hash(&[a, b])
    }

    /// Capacity initializer binding the input length.
    fn iv(&self, len: usize) -> Fr {
        self.domain_iv + Fr::from(len as u64)
    }

    /// The Poseidon permutation: add constants, S-box, MDS mix.
    fn permute(&self, state: &mut [Fr; STATE_WIDTH]) {
        let half_full = FULL_ROUNDS / 2;
        for (round, constants) in self.round_constants.iter().enumerate() {
            for (s, c) in state.iter_mut().zip(constants) {
                *s += *c;
            }
            let full = round < half_full || round >= half_full + PARTIAL_ROUNDS;
            if full {
                for s in state.iter_mut() {
                    *s = sbox(*s);
                }
            } else {
                state[0] = sbox(state[0]);
            }
            self.apply_mds(state);
        }
    }

    fn apply_mds(&self, state: &mut [Fr; STATE_WIDTH]) {
        let mut next = [Fr::from(0u64); STATE_WIDTH];
        for (i, row) in self.mds.iter().enumerate() {
            for (m, s) in row.iter().zip(state.iter()) {
                next[i] += *m * *s;
            }
        }
        *state = next;
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// x^5 — the smallest power coprime to the BN254 group order.
#[inline]
fn sbox(x: Fr) -> Fr {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x
}

/// One derived parameter: `SHA-256(tag ‖ kind ‖ round ‖ index)` reduced
/// into the field.
fn derive_constant(kind: &str, round: usize, index: usize) -> Fr {
    let mut hasher = Sha256::new();
    hasher.update(PARAMETER_TAG.as_bytes());
    hasher.update([0x1f]);
    hasher.update(kind.as_bytes());
    hasher.update((round as u64).to_be_bytes());
    hasher.update((index as u64).to_be_bytes());
    FieldElement::from_bytes_reduce(&hasher.finalize()).inner()
}

/// 3×3 Cauchy matrix `M[i][j] = 1 / (x_i + y_j)` over the disjoint
/// sequences `x = (0, 1, 2)` and `y = (3, 4, 5)`. Cauchy matrices over
/// distinct points are invertible, which is the MDS requirement.
fn cauchy_mds() -> [[Fr; STATE_WIDTH]; STATE_WIDTH] {
    let mut mds = [[Fr::from(0u64); STATE_WIDTH]; STATE_WIDTH];
    for (i, row) in mds.iter_mut().enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            let sum = Fr::from((i + j + STATE_WIDTH) as u64);
            // The sums are the constants 3..=7, all non-zero in Fr.
            *entry = sum.inverse().expect("Cauchy sums are non-zero constants");
        }
    }
    mds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_across_instances() {
        let a = PoseidonHasher::new();
        let b = PoseidonHasher::new();
        let inputs = [FieldElement::from_u64(1), FieldElement::from_u64(2)];
        assert_eq!(a.hash(&inputs), b.hash(&inputs));
    }

    #[test]
    fn hash_depends_on_every_input() {
        let hasher = PoseidonHasher::new();
        let base = hasher.hash(&[FieldElement::from_u64(1), FieldElement::from_u64(2)]);
        let first = hasher.hash(&[FieldElement::from_u64(9), FieldElement::from_u64(2)]);
        let second = hasher.hash(&[FieldElement::from_u64(1), FieldElement::from_u64(9)]);
        assert_ne!(base, first);
        assert_ne!(base, second);
    }

    #[test]
    fn hash_depends_on_input_order() {
        let hasher = PoseidonHasher::new();
        let ab = hasher.hash(&[FieldElement::from_u64(1), FieldElement::from_u64(2)]);
        let ba = hasher.hash(&[FieldElement::from_u64(2), FieldElement::from_u64(1)]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn length_binding_prevents_padding_collisions() {
        let hasher = PoseidonHasher::new();
        let one = hasher.hash(&[FieldElement::from_u64(5)]);
        let padded = hasher.hash(&[FieldElement::from_u64(5), FieldElement::zero()]);
        assert_ne!(one, padded);
    }

    #[test]
    fn odd_and_even_arities_all_hash() {
        let hasher = PoseidonHasher::new();
        let mut seen = Vec::new();
        for n in 0..=11usize {
            let inputs: Vec<FieldElement> =
                (0..n).map(|i| FieldElement::from_u64(i as u64 + 1)).collect();
            let out = hasher.hash(&inputs);
            assert!(!seen.contains(&out), "arity {n} collided");
            seen.push(out);
        }
    }

    #[test]
    fn hash_pair_matches_two_element_hash() {
        let hasher = PoseidonHasher::new();
        let a = FieldElement::from_u64(11);
        let b = FieldElement::from_u64(22);
        assert_eq!(hasher.hash_pair(a, b), hasher.hash(&[a, b]));
    }

    #[test]
    fn output_is_never_an_input_echo() {
        // Smoke check that the permutation actually mixes.
        let hasher = PoseidonHasher::new();
        let x = FieldElement::from_u64(1234);
        let out = hasher.hash(&[x]);
        assert_ne!(out, x);
        assert!(!out.is_zero());
    }

    #[test]
    fn mds_matrix_is_cauchy_over_3_to_7() {
        let mds = cauchy_mds();
        for (i, row) in mds.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                let sum = Fr::from((i + j + STATE_WIDTH) as u64);
                assert_eq!(*entry * sum, Fr::from(1u64));
            }
        }
    }

    #[test]
    fn round_constant_count_matches_schedule() {
        let hasher = PoseidonHasher::new();
        assert_eq!(hasher.round_constants.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
    }
}
