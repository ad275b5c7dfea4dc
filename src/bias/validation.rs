//! bias::validation — input guards for probabilities and target rates.
//!
//! Each guard reports the first offending row or entry. They run before any
//! numerical work so that configuration problems fail fast.
use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::bias::errors::{BiasError, BiasResult};

/// Maximum |Σ_j p(i,j) − 1| accepted for a probability row.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Default maximum |Σ target − 1| accepted for a target-rate vector.
pub const DEFAULT_RATE_TOLERANCE: f64 = 1e-6;

/// Validate a softmax output matrix.
///
/// # Errors
/// - `BiasError::EmptyProbabilities` when `n == 0` or `m == 0`.
/// - `BiasError::InvalidProbabilities` for the first row holding a
///   non-finite value, a value outside [0, 1], or a sum off by more than
///   [`ROW_SUM_TOLERANCE`].
pub fn validate_probability_rows(values: ArrayView2<'_, f64>) -> BiasResult<()> {
    if values.nrows() == 0 || values.ncols() == 0 {
        return Err(BiasError::EmptyProbabilities);
    }
    for (row, probs) in values.axis_iter(Axis(0)).enumerate() {
        if let Some(&value) = probs.iter().find(|v| !v.is_finite()) {
            return Err(BiasError::InvalidProbabilities {
                row,
                reason: format!("non-finite probability {value}"),
            });
        }
        if let Some(&value) = probs.iter().find(|v| **v < 0.0 || **v > 1.0) {
            return Err(BiasError::InvalidProbabilities {
                row,
                reason: format!("probability {value} outside [0, 1]"),
            });
        }
        let sum = probs.sum();
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(BiasError::InvalidProbabilities {
                row,
                reason: format!("row sums to {sum}"),
            });
        }
    }
    Ok(())
}

/// Validate a target-rate vector against the expected class count.
///
/// # Errors
/// - `BiasError::TargetRateMismatch` if `rates.len() != classes`.
/// - `BiasError::InvalidTargetRate` for the first entry outside (0, 1).
/// - `BiasError::TargetRatesDoNotSumToOne` if |Σ − 1| > `tolerance`.
pub fn validate_target_rates(
    rates: ArrayView1<'_, f64>, classes: usize, tolerance: f64,
) -> BiasResult<()> {
    if rates.len() != classes {
        return Err(BiasError::TargetRateMismatch { expected: classes, found: rates.len() });
    }
    for (index, &value) in rates.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 || value >= 1.0 {
            return Err(BiasError::InvalidTargetRate { index, value });
        }
    }
    let sum = rates.sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(BiasError::TargetRatesDoNotSumToOne { sum, tolerance });
    }
    Ok(())
}

/// # Errors
/// - `BiasError::InvalidRateTolerance` unless finite and positive.
pub fn verify_rate_tolerance(value: f64) -> BiasResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BiasError::InvalidRateTolerance { value });
    }
    Ok(())
}
