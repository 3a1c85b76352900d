//! A tool to calculate the Pearson correlation coefficient.

use std::result::Result;
use crate::error::CorrelationError;


fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let total = values.iter().sum::<f64>();
    if total.is_finite() {
        total / n
    } else {
        // the sum overflowed, divide first
        values.iter().map(|i| i / n).sum()
    }
}

// largest absolute deviation from the mean
fn scale(values: &[f64], values_mean: f64) -> f64 {
    values.iter()
        .map(|i| (i - values_mean).abs())
        .fold(0., f64::max)
}

// square root of the sum of squared deviations, not divided by the number of observations,
// deviations are divided by `values_scale` before squaring so the sum cannot overflow or underflow
fn std(values: &[f64], values_mean: f64, values_scale: f64) -> f64 {
    values.iter()
        .map(|i| ((i - values_mean) / values_scale).powf(2.0))
        .sum::<f64>()
        .sqrt()
}

fn check_series(values: &[f64], name: &str) -> Result<(), CorrelationError> {
    if values.iter().any(|i| !i.is_finite()) {
        return Err(CorrelationError::NonFinite { series: String::from(name) });
    }
    if values.iter().all(|i| *i == values[0]) {
        return Err(CorrelationError::ZeroVariance { series: String::from(name) });
    }

    Ok(())
}

fn spread(values: &[f64], name: &str) -> Result<(f64, f64, f64), CorrelationError> {
    let values_mean = mean(values);
    let values_scale = scale(values, values_mean);

    if !values_mean.is_finite() || !values_scale.is_finite() {
        return Err(CorrelationError::Overflow { series: String::from(name) });
    }
    if values_scale == 0. {
        return Err(CorrelationError::ZeroVariance { series: String::from(name) });
    }

    Ok((values_mean, values_scale, std(values, values_mean, values_scale)))
}

/// Means and spreads of two paired series, these are unchanged by reordering either
/// series so they only need to be calculated once per permutation test
///
/// Deviations from the mean are measured in units of the largest absolute deviation,
/// which keeps every term of the sums between `-1` and `1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PearsonSummary {
    pub x_mean: f64,
    pub y_mean: f64,
    /// Largest absolute deviation of `x` from its mean
    pub x_scale: f64,
    /// Largest absolute deviation of `y` from its mean
    pub y_scale: f64,
    /// Square root of the sum of squared deviations of `x`, in units of `x_scale`
    pub x_std: f64,
    /// Square root of the sum of squared deviations of `y`, in units of `y_scale`
    pub y_std: f64,
}

impl PearsonSummary {
    /// Summarizes two series named `X` and `Y` in errors
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, CorrelationError> {
        Self::with_names(x, y, "X", "Y")
    }

    /// Summarizes two series, errors if they differ in length, have fewer than 2
    /// observations, contain non-finite values, have deviations too large to represent
    /// or either has zero variance (the error names the offending series)
    pub fn with_names(x: &[f64], y: &[f64], x_name: &str, y_name: &str) -> Result<Self, CorrelationError> {
        if x.len() != y.len() {
            return Err(CorrelationError::SeriesAreNotSameLength { x_len: x.len(), y_len: y.len() });
        }
        if x.len() < 2 {
            return Err(CorrelationError::TooFewObservations(x.len()));
        }

        check_series(x, x_name)?;
        check_series(y, y_name)?;

        let (x_mean, x_scale, x_std) = spread(x, x_name)?;
        let (y_mean, y_scale, y_std) = spread(y, y_name)?;

        Ok(PearsonSummary { x_mean, y_mean, x_scale, y_scale, x_std, y_std })
    }

    /// Calculates the coefficient of `x` against `y` where both are orderings of the
    /// series this summary was built from
    pub fn coefficient(&self, x: &[f64], y: &[f64]) -> f64 {
        let covariance: f64 = x.iter().zip(y.iter())
            .map(|(i, j)| ((i - self.x_mean) / self.x_scale) * ((j - self.y_mean) / self.y_scale))
            .sum();

        covariance / self.x_std / self.y_std
    }

    /// Calculates the coefficient like [`PearsonSummary::coefficient`] but errors
    /// instead of returning a value that is not finite
    pub fn checked_coefficient(&self, x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
        let r = self.coefficient(x, y);
        if !r.is_finite() {
            return Err(CorrelationError::UndefinedCoefficient);
        }

        Ok(r)
    }
}

/// Calculates the Pearson correlation coefficient given two vectors of the same length,
/// errors instead of returning `NaN` if either series has zero variance
pub fn pearsonr(x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
    PearsonSummary::new(x, y)?.checked_coefficient(x, y)
}
