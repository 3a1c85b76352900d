#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use corcoef::{
        correlation::{pearsonr, PearsonSummary},
        error::CorrelationError,
    };


    const SERIES: [f64; 7] = [3.2, -1.0, 4.5, 0.25, 9.0, 2.0, 7.75];
    const OTHER: [f64; 7] = [1.0, 0.5, 2.0, -3.0, 4.0, 4.5, 1.25];

    #[test]
    pub fn test_self_correlation_is_one() -> Result<(), CorrelationError> {
        assert_relative_eq!(pearsonr(&SERIES, &SERIES)?, 1., epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_negation_correlation_is_minus_one() -> Result<(), CorrelationError> {
        let negated: Vec<f64> = SERIES.iter().map(|i| -i).collect();
        assert_relative_eq!(pearsonr(&SERIES, &negated)?, -1., epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_symmetry() -> Result<(), CorrelationError> {
        assert_relative_eq!(pearsonr(&SERIES, &OTHER)?, pearsonr(&OTHER, &SERIES)?, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_known_value() -> Result<(), CorrelationError> {
        let x = [1., 2., 3., 4., 5.];
        let y = [2., 4., 5., 4., 5.];

        // cov = 6, sum of squares 10 and 6
        assert_relative_eq!(pearsonr(&x, &y)?, 6. / (60_f64).sqrt(), epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_invariant_to_shift_and_scale() -> Result<(), CorrelationError> {
        let scaled: Vec<f64> = OTHER.iter().map(|i| 3. * i + 100.).collect();
        assert_relative_eq!(pearsonr(&SERIES, &scaled)?, pearsonr(&SERIES, &OTHER)?, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_zero_variance_names_series() {
        let constant = [2.; 7];

        assert_eq!(
            pearsonr(&constant, &SERIES),
            Err(CorrelationError::ZeroVariance { series: String::from("X") })
        );
        assert_eq!(
            pearsonr(&SERIES, &constant),
            Err(CorrelationError::ZeroVariance { series: String::from("Y") })
        );
        assert_eq!(
            PearsonSummary::with_names(&SERIES, &constant, "gut", "skin"),
            Err(CorrelationError::ZeroVariance { series: String::from("skin") })
        );
    }

    #[test]
    pub fn test_invalid_inputs() {
        assert_eq!(
            pearsonr(&[1., 2., 3.], &[1., 2.]),
            Err(CorrelationError::SeriesAreNotSameLength { x_len: 3, y_len: 2 })
        );
        assert_eq!(pearsonr(&[1.], &[2.]), Err(CorrelationError::TooFewObservations(1)));
        assert_eq!(pearsonr(&[], &[]), Err(CorrelationError::TooFewObservations(0)));
        assert_eq!(
            pearsonr(&[1., f64::NAN, 3.], &[1., 2., 3.]),
            Err(CorrelationError::NonFinite { series: String::from("X") })
        );
    }

    #[test]
    pub fn test_huge_values_do_not_overflow() -> Result<(), CorrelationError> {
        let x = [1e200, -1e200, 0., 5e199];
        let y = [3e199, -2e200, 1e199, 4e199];

        assert_relative_eq!(pearsonr(&x, &x)?, 1., epsilon = 1e-12);

        let rescaled: Vec<f64> = y.iter().map(|i| i * 1e-200).collect();
        assert_relative_eq!(pearsonr(&x, &y)?, pearsonr(&x, &rescaled)?, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_tiny_values_are_not_zero_variance() -> Result<(), CorrelationError> {
        let x = [1e-200, 2e-200, 3e-200];

        assert_relative_eq!(pearsonr(&x, &[1., 2., 3.])?, 1., epsilon = 1e-12);
        assert_relative_eq!(pearsonr(&x, &[3e-200, 2e-200, 1e-200])?, -1., epsilon = 1e-12);

        Ok(())
    }

    #[test]
    pub fn test_unrepresentable_spread_is_an_error() {
        let x = [1.7e308, -1.7e308, 1.7e308];

        assert_eq!(
            pearsonr(&x, &[1., 2., 3.]),
            Err(CorrelationError::Overflow { series: String::from("X") })
        );
    }

    #[test]
    pub fn test_coefficient_stays_in_range() -> Result<(), CorrelationError> {
        let r = pearsonr(&SERIES, &OTHER)?;
        assert!((-1. ..=1.).contains(&r));

        Ok(())
    }
}
