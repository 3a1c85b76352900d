//! All-pairs correlation matrix over the rows of a labeled table, with a permutation
//! test for every pair.

use std::result::Result;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use crate::{
    correlation::PearsonSummary,
    error::{CorcoefError, PermutationError},
    permutation::{permutation_test_with_summary, PermutationTestResult},
    table::LabeledTable,
};


/// p-values smaller than this are stored as exactly `0`
pub const DEFAULT_ZERO_THRESHOLD: f64 = 1e-13;

/// Test result for one unordered pair of rows
#[derive(Debug, Clone, PartialEq)]
pub struct PairTest {
    /// Index of the first row (always less than `second`)
    pub first: usize,
    pub second: usize,
    pub result: PermutationTestResult,
}

/// Square matrix with coefficients above the diagonal and p-values below it,
/// `cells[[a, b]]` with `a < b` is the coefficient of rows `a` and `b` and
/// `cells[[b, a]]` is its p-value, the diagonal holds `1`
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub cells: Array2<f64>,
    pub pairs: Vec<PairTest>,
}

impl CorrelationMatrix {
    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Coefficient between two rows, in either order
    pub fn coefficient(&self, a: usize, b: usize) -> f64 {
        if a <= b { self.cells[[a, b]] } else { self.cells[[b, a]] }
    }

    /// p-value between two distinct rows, in either order
    pub fn p_value(&self, a: usize, b: usize) -> f64 {
        if a >= b { self.cells[[a, b]] } else { self.cells[[b, a]] }
    }
}

/// Calculates the coefficient and permutation p-value of every pair of rows in the table
///
/// Each pair works on its own copies of the two rows and its own generator, the generators
/// are all seeded from `rng` before any pair runs so that results for a given seed do not
/// depend on how pairs are scheduled across threads
pub fn correlation_matrix<R: Rng + ?Sized>(
    table: &LabeledTable,
    max_permutations: u64,
    zero_threshold: f64,
    rng: &mut R,
) -> Result<CorrelationMatrix, CorcoefError> {
    if max_permutations == 0 {
        return Err(PermutationError::ZeroBudget.into());
    }

    let size = table.rows();
    let rows: Vec<Vec<f64>> = (0..size)
        .map(|i| table.row(i).to_vec())
        .collect();

    let mut jobs: Vec<(usize, usize, u64)> = Vec::with_capacity(size * size.saturating_sub(1) / 2);
    for first in 0..size {
        for second in (first + 1)..size {
            jobs.push((first, second, rng.gen()));
        }
    }
    tracing::info!(rows = size, pairs = jobs.len(), max_permutations, "testing all pairs");

    let pairs: Result<Vec<PairTest>, CorcoefError> = jobs
        .into_par_iter()
        .map(|(first, second, seed)| -> Result<PairTest, CorcoefError> {
            let (x, y) = (&rows[first], &rows[second]);
            let summary = PearsonSummary::with_names(
                x, y, &table.row_labels[first], &table.row_labels[second],
            )?;

            let mut pair_rng = StdRng::seed_from_u64(seed);
            let result = permutation_test_with_summary(&summary, x, y, max_permutations, &mut pair_rng)?;
            tracing::debug!(
                first = %table.row_labels[first],
                second = %table.row_labels[second],
                r = result.coefficient,
                p = result.p_value(),
                "pair tested"
            );

            Ok(PairTest { first, second, result })
        })
        .collect();
    let pairs = pairs?;

    let mut cells = Array2::<f64>::zeros((size, size));
    cells.diag_mut().fill(1.);
    for pair in pairs.iter() {
        let p_value = pair.result.p_value();

        cells[[pair.first, pair.second]] = pair.result.coefficient;
        cells[[pair.second, pair.first]] = if p_value.abs() < zero_threshold { 0. } else { p_value };
    }

    Ok(CorrelationMatrix { labels: table.row_labels.clone(), cells, pairs })
}
