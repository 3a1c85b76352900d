#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use corcoef::{
        correlation::pearsonr,
        error::{CorcoefError, CorrelationError},
        matrix::{correlation_matrix, DEFAULT_ZERO_THRESHOLD},
        permutation::{permutation_test, seeded_rng, PermutationMode},
        report::render_matrix,
        table::{parse_labeled_table, LabeledTable},
    };


    const MICROBIOMES: &str = "sample\tb1\tb2\tb3\tb4\tb5\n\
        gut\t0.10\t0.25\t0.05\t0.40\t0.20\n\
        skin\t0.12\t0.20\t0.08\t0.35\t0.25\n\
        oral\t0.30\t0.05\t0.40\t0.05\t0.20\n\
        soil\t0.22\t0.18\t0.20\t0.30\t0.10\n";

    fn table() -> LabeledTable {
        parse_labeled_table(MICROBIOMES).unwrap()
    }

    #[test]
    pub fn test_triangles_hold_coefficients_and_p_values() -> Result<(), CorcoefError> {
        let table = table();
        let matrix = correlation_matrix(&table, 1_000, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(5)))?;

        assert_eq!(matrix.size(), 4);
        assert_eq!(matrix.labels, vec!["gut", "skin", "oral", "soil"]);
        assert_eq!(matrix.pairs.len(), 6);

        for a in 0..4 {
            assert_eq!(matrix.cells[[a, a]], 1.);
            for b in (a + 1)..4 {
                let expected = pearsonr(&table.row(a).to_vec(), &table.row(b).to_vec())?;
                assert_relative_eq!(matrix.cells[[a, b]], expected, epsilon = 1e-12);
                assert_relative_eq!(matrix.coefficient(b, a), expected, epsilon = 1e-12);

                let p_value = matrix.cells[[b, a]];
                assert!((0. ..=1.).contains(&p_value));
                assert_eq!(matrix.p_value(a, b), p_value);
            }
        }

        Ok(())
    }

    #[test]
    pub fn test_pairs_match_single_pair_exact_test() -> Result<(), CorcoefError> {
        let table = table();
        // 5! = 120 orderings, every pair is enumerated exactly
        let matrix = correlation_matrix(&table, 1_000, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(5)))?;

        for pair in matrix.pairs.iter() {
            assert_eq!(pair.result.mode, PermutationMode::Exact);

            let single = permutation_test(
                &table.row(pair.first).to_vec(),
                &table.row(pair.second).to_vec(),
                1_000,
                &mut seeded_rng(Some(0)),
            )?;
            assert_eq!(pair.result.extreme, single.extreme);
            assert_eq!(pair.result.total, 120);
        }

        Ok(())
    }

    #[test]
    pub fn test_same_seed_same_matrix() -> Result<(), CorcoefError> {
        let table = table();

        let first = correlation_matrix(&table, 50, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(9)))?;
        let second = correlation_matrix(&table, 50, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(9)))?;

        assert!(first.pairs.iter().all(|pair| pair.result.mode == PermutationMode::Sampled));
        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    pub fn test_table_rows_unchanged() -> Result<(), CorcoefError> {
        let table = table();
        let before = table.values.clone();

        correlation_matrix(&table, 50, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(1)))?;

        assert_eq!(table.values, before);

        Ok(())
    }

    #[test]
    pub fn test_zero_threshold_clears_small_p_values() -> Result<(), CorcoefError> {
        let table = table();
        let matrix = correlation_matrix(&table, 1_000, 2., &mut seeded_rng(Some(5)))?;

        for a in 0..4 {
            for b in 0..a {
                assert_eq!(matrix.cells[[a, b]], 0.);
            }
        }

        Ok(())
    }

    #[test]
    pub fn test_constant_row_names_label() {
        let table = parse_labeled_table("x a b c\nr1 1 2 3\nflat 4 4 4\n").unwrap();

        match correlation_matrix(&table, 100, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(0))) {
            Err(CorcoefError::CorrelationRelatedError(CorrelationError::ZeroVariance { series })) => {
                assert_eq!(series, "flat");
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    pub fn test_render_matrix_layout() -> Result<(), CorcoefError> {
        let table = parse_labeled_table("id c1 c2 c3\nA 1 2 3\nB 2 4 6\n").unwrap();
        let matrix = correlation_matrix(&table, 100, DEFAULT_ZERO_THRESHOLD, &mut seeded_rng(Some(0)))?;

        // 3! = 6 orderings, the identity and the reversal are as extreme as r = 1
        assert_eq!(
            render_matrix(&matrix),
            "\tA\tB\t\nA\t   *\t1.000\t\nB\t0.3333\t   *\t\n",
        );

        Ok(())
    }
}
