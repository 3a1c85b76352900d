//! # Correlation Coefficient Tests
//!
//! `corcoef` reads numeric tables from delimited text files, calculates Pearson
//! correlation coefficients and estimates their two-tailed significance with a
//! permutation test. When the number of possible orderings fits within the
//! permutation budget the test is exact (Heap's algorithm), otherwise it samples
//! random orderings (Fisher-Yates shuffle) from a single generator seeded once per run.
//!
//! The `read_table`, `corcoef_test` and `correlation_matrix` programs are thin
//! entry points over these modules.
//!
//! ## Example Code
//!
//! ```rust
//! use corcoef::{
//!     correlation::pearsonr,
//!     permutation::{permutation_test, seeded_rng, PermutationMode},
//!     table::parse_paired_table,
//! };
//!
//! let table = parse_paired_table("1\t2\n2\t4\n3\t6\n").unwrap();
//! assert!((pearsonr(&table.x, &table.y).unwrap() - 1.).abs() < 1e-12);
//!
//! // 3! = 6 orderings fit in the budget so every one of them is tested,
//! // the identity and the reversal are both as extreme as r = 1
//! let mut rng = seeded_rng(Some(21));
//! let result = permutation_test(&table.x, &table.y, 1000, &mut rng).unwrap();
//! assert_eq!(result.mode, PermutationMode::Exact);
//! assert_eq!((result.extreme, result.total), (2, 6));
//! ```
//!
//! ### Correlation matrix
//!
//! ```rust
//! use corcoef::{
//!     matrix::{correlation_matrix, DEFAULT_ZERO_THRESHOLD},
//!     permutation::seeded_rng,
//!     report::render_matrix,
//!     table::parse_labeled_table,
//! };
//!
//! let table = parse_labeled_table(
//!     "sample\ta\tb\tc\td\n\
//!      s1\t1\t2\t3\t4\n\
//!      s2\t2\t4\t6\t9\n\
//!      s3\t4\t1\t3\t2\n",
//! ).unwrap();
//!
//! let mut rng = seeded_rng(Some(7));
//! let matrix = correlation_matrix(&table, 10_000, DEFAULT_ZERO_THRESHOLD, &mut rng).unwrap();
//! assert_eq!(matrix.size(), 3);
//! print!("{}", render_matrix(&matrix));
//! ```

pub mod config;
pub mod correlation;
pub mod error;
pub mod matrix;
pub mod permutation;
pub mod report;
pub mod table;
