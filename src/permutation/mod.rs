//! Permutation tests for the significance of a correlation coefficient.
//!
//! The null distribution is built by reordering one series against the other and
//! recalculating the coefficient. When every ordering fits within the permutation
//! budget each one is visited exactly once with Heap's algorithm, otherwise the
//! budget is spent on uniformly random orderings from the Fisher-Yates shuffle.

use std::result::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use crate::{
    correlation::PearsonSummary,
    error::{CorcoefError, PermutationError},
};


/// Relative slack on `|r0|` when deciding if a permutation is as extreme as the observation,
/// orderings that are exactly as extreme in theory (the identity, the reversal of a linear
/// relationship, swaps of tied values) can otherwise land one rounding step below it
pub const EXTREMITY_TOLERANCE: f64 = 1e-12;

/// How the null distribution was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermutationMode {
    /// Every possible ordering was tested once
    Exact,
    /// A fixed number of random orderings was tested
    Sampled,
}

/// Outcome of a two-tailed permutation test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PermutationTestResult {
    /// Observed coefficient of the original pairing
    pub coefficient: f64,
    /// Number of permutations with `|r| >= |r0|`
    pub extreme: u64,
    /// Number of permutations tested (`n!` when exact, the budget when sampled)
    pub total: u64,
    pub mode: PermutationMode,
}

impl PermutationTestResult {
    /// Two-tailed p-value, fraction of tested permutations at least as extreme as the observation
    pub fn p_value(&self) -> f64 {
        self.extreme as f64 / self.total as f64
    }
}

/// Calculates `n!` but stops multiplying as soon as the product exceeds `cap`, so any
/// result greater than `cap` only means there are more than `cap` permutations
pub fn capped_factorial(n: usize, cap: u64) -> u64 {
    let mut fact: u128 = 1;
    for i in 2..=n {
        if fact > cap as u128 {
            break;
        }
        fact *= i as u128;
    }

    u64::try_from(fact).unwrap_or(u64::MAX)
}

/// Shuffles the values in place into a uniformly random ordering (Fisher-Yates),
/// `j` may equal `i` so that every ordering is equally likely
pub fn fisher_yates_shuffle<T, R: Rng + ?Sized>(values: &mut [T], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.gen_range(0..=i);
        values.swap(i, j);
    }
}

/// Visits every ordering of the values exactly once using the iterative form of Heap's
/// algorithm, the values are visited as given first and each following ordering differs
/// from the previous one by a single swap
pub fn heap_permutations<T, F: FnMut(&[T])>(values: &mut [T], mut visit: F) {
    let n = values.len();
    visit(values);

    let mut k = vec![0; n];
    let mut i = 1;
    while i < n {
        if k[i] < i {
            let j = k[i] * (i % 2);
            values.swap(i, j);
            visit(values);

            k[i] += 1;
            i = 1;
        } else {
            k[i] = 0;
            i += 1;
        }
    }
}

/// Creates the generator for a run, from `seed` when given and otherwise from a
/// random seed, the seed used is logged so the run can be repeated
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::debug!(seed, "random number generator seeded");

    StdRng::seed_from_u64(seed)
}

/// Estimates the two-tailed p-value of the correlation between `x` and `y` by reordering
/// a private copy of `y`, exactly if `n!` is at most `max_permutations` and by sampling
/// `max_permutations` random orderings otherwise
pub fn permutation_test<R: Rng + ?Sized>(
    x: &[f64],
    y: &[f64],
    max_permutations: u64,
    rng: &mut R,
) -> Result<PermutationTestResult, CorcoefError> {
    if max_permutations == 0 {
        return Err(PermutationError::ZeroBudget.into());
    }

    let summary = PearsonSummary::new(x, y)?;

    permutation_test_with_summary(&summary, x, y, max_permutations, rng)
}

/// Runs the permutation test with a summary already calculated for `x` and `y`,
/// errors if the observed coefficient is not finite since no ordering could be compared to it
pub fn permutation_test_with_summary<R: Rng + ?Sized>(
    summary: &PearsonSummary,
    x: &[f64],
    y: &[f64],
    max_permutations: u64,
    rng: &mut R,
) -> Result<PermutationTestResult, CorcoefError> {
    if max_permutations == 0 {
        return Err(PermutationError::ZeroBudget.into());
    }

    let coefficient = summary.checked_coefficient(x, y)?;
    let threshold = coefficient.abs() * (1. - EXTREMITY_TOLERANCE);
    let fact = capped_factorial(x.len(), max_permutations);

    let mut shuffled = y.to_vec();
    let mut extreme: u64 = 0;

    if fact > max_permutations {
        tracing::debug!(samples = max_permutations, "sampling random permutations");

        for _ in 0..max_permutations {
            fisher_yates_shuffle(&mut shuffled, rng);
            if summary.coefficient(x, &shuffled).abs() >= threshold {
                extreme += 1;
            }
        }

        Ok(PermutationTestResult { coefficient, extreme, total: max_permutations, mode: PermutationMode::Sampled })
    } else {
        tracing::debug!(permutations = fact, "enumerating all permutations");

        // the identity ordering is visited first and always counts as extreme
        let mut visited: u64 = 0;
        heap_permutations(&mut shuffled, |ordering| {
            visited += 1;
            if summary.coefficient(x, ordering).abs() >= threshold {
                extreme += 1;
            }
        });
        debug_assert_eq!(visited, fact);

        Ok(PermutationTestResult { coefficient, extreme, total: fact, mode: PermutationMode::Exact })
    }
}
