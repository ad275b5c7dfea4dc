//! assessment::validation — guards shared by the fit statistics.
//!
//! - [`validate_pair`]: aligned, finite `(fit, obs)` vectors.
//! - [`validate_unit_interval`]: observed outcomes usable as KS masses.
//! - [`validate_quantiles`]: a low/high quantile pair.
use ndarray::ArrayView1;

use crate::assessment::errors::{AssessError, AssessResult};

/// # Errors
/// - `AssessError::LengthMismatch` if the lengths differ.
/// - `AssessError::NonFiniteValue` for the first NaN or infinite entry.
pub fn validate_pair(fit: ArrayView1<'_, f64>, obs: ArrayView1<'_, f64>) -> AssessResult<()> {
    if fit.len() != obs.len() {
        return Err(AssessError::LengthMismatch {
            what: "observed values",
            expected: fit.len(),
            found: obs.len(),
        });
    }
    check_finite("fit", fit)?;
    check_finite("observed", obs)
}

/// # Errors
/// - `AssessError::ObservedOutOfRange` for the first entry outside [0, 1].
pub fn validate_unit_interval(obs: ArrayView1<'_, f64>) -> AssessResult<()> {
    match obs.iter().position(|v| !(0.0..=1.0).contains(v)) {
        Some(index) => Err(AssessError::ObservedOutOfRange { index, value: obs[index] }),
        None => Ok(()),
    }
}

/// # Errors
/// - `AssessError::InvalidQuantiles` unless `0 ≤ low < high ≤ 1`.
pub fn validate_quantiles(low: f64, high: f64) -> AssessResult<()> {
    if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
        return Err(AssessError::InvalidQuantiles { low, high });
    }
    Ok(())
}

fn check_finite(what: &'static str, values: ArrayView1<'_, f64>) -> AssessResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(AssessError::NonFiniteValue { what, index, value: values[index] }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every error branch and the success paths.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pairs must align and be finite.
    //
    // Given
    // -----
    // - A length mismatch, a NaN in `obs`, and a clean pair.
    //
    // Expect
    // ------
    // - `LengthMismatch`, `NonFiniteValue { what: "observed", index: 1 }`, `Ok`.
    fn validate_pair_checks_shape_and_finiteness() {
        let fit = array![0.1, 0.2];

        assert!(matches!(
            validate_pair(fit.view(), array![1.0].view()),
            Err(AssessError::LengthMismatch { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            validate_pair(fit.view(), array![1.0, f64::NAN].view()),
            Err(AssessError::NonFiniteValue { what: "observed", index: 1, .. })
        ));
        assert!(validate_pair(fit.view(), array![0.0, 1.0].view()).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Observed masses and quantile bounds are range-checked.
    //
    // Given
    // -----
    // - obs (0, 1.5); quantiles (0.9, 0.1), (−0.1, 0.5), (0.05, 0.95).
    //
    // Expect
    // ------
    // - Out-of-range at index 1; two quantile errors; one success.
    fn unit_interval_and_quantiles() {
        assert_eq!(
            validate_unit_interval(array![0.0, 1.5].view()),
            Err(AssessError::ObservedOutOfRange { index: 1, value: 1.5 })
        );
        assert!(validate_quantiles(0.9, 0.1).is_err());
        assert!(validate_quantiles(-0.1, 0.5).is_err());
        assert!(validate_quantiles(0.05, 0.95).is_ok());
    }
}
