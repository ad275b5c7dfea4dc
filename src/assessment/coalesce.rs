//! assessment::coalesce — reduce a group of class columns to one value per
//! row, and pair fitted with observed values.
//!
//! Purpose
//! -------
//! Summing a [`TargetSet`] of columns turns a probability matrix into "mass
//! on any target class" and a one-hot matrix into "true class is a target
//! class". The same reduction therefore yields both halves of the
//! [`FitObs`] pair every statistic consumes.
//!
//! Key behaviors
//! -------------
//! - [`coalesce`] sums the target columns with `ndarray` selection and
//!   reduction, optionally restricted by a [`Slicer`].
//! - [`ScoreSource::OneHot`] inputs are checked row by row: exactly one 1
//!   and zeros elsewhere.
//! - [`FitObs::continuous`] maps model-space values of a continuous target
//!   back to natural units with the field's normalization.
use std::collections::BTreeSet;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::{
    assessment::{
        errors::{AssessError, AssessResult},
        slicer::Slicer,
        validation::validate_pair,
    },
    data::field::Normalization,
};

/// Validated, sorted set of target column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    columns: Vec<usize>,
}

impl TargetSet {
    /// # Errors
    /// - `AssessError::EmptyTargetSet` for no columns.
    /// - `AssessError::DuplicateTargetColumn` for a repeated index.
    /// - `AssessError::InvalidTargetColumn` for an index `≥ width`.
    pub fn new(columns: &[usize], width: usize) -> AssessResult<Self> {
        if columns.is_empty() {
            return Err(AssessError::EmptyTargetSet);
        }
        let mut seen = BTreeSet::new();
        for &index in columns {
            if index >= width {
                return Err(AssessError::InvalidTargetColumn { index, columns: width });
            }
            if !seen.insert(index) {
                return Err(AssessError::DuplicateTargetColumn { index });
            }
        }
        Ok(Self { columns: seen.into_iter().collect() })
    }

    /// All columns `0..width`.
    ///
    /// # Errors
    /// - `AssessError::EmptyTargetSet` when `width == 0`.
    pub fn all(width: usize) -> AssessResult<Self> {
        Self::new(&(0..width).collect::<Vec<_>>(), width)
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    fn check_width(&self, width: usize) -> AssessResult<()> {
        match self.columns.last() {
            Some(&index) if index >= width => {
                Err(AssessError::InvalidTargetColumn { index, columns: width })
            }
            _ => Ok(()),
        }
    }
}

/// What the matrix handed to [`coalesce`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// Model scores, e.g. class probabilities.
    Scores,
    /// One-hot encoding of an observed categorical target.
    OneHot,
}

/// `out[i] = Σ_{j ∈ targets} matrix[i, j]` over the rows kept by `mask`.
///
/// # Errors
/// - `AssessError::InvalidTargetColumn` if a target is outside the matrix.
/// - `AssessError::LengthMismatch` if the mask does not cover the rows.
/// - `AssessError::InvalidOneHot` for a malformed one-hot row.
pub fn coalesce(
    matrix: ArrayView2<'_, f64>, targets: &TargetSet, source: ScoreSource, mask: Option<&Slicer>,
) -> AssessResult<Array1<f64>> {
    targets.check_width(matrix.ncols())?;
    if let Some(mask) = mask {
        if mask.rows() != matrix.nrows() {
            return Err(AssessError::LengthMismatch {
                what: "slice mask",
                expected: matrix.nrows(),
                found: mask.rows(),
            });
        }
    }
    let rows = match mask {
        Some(mask) => matrix.select(Axis(0), &mask.indices()),
        None => matrix.to_owned(),
    };
    if source == ScoreSource::OneHot {
        check_one_hot(rows.view(), mask)?;
    }
    Ok(rows.select(Axis(1), targets.columns()).sum_axis(Axis(1)))
}

/// Check that every row holds a single 1 and zeros elsewhere.
///
/// `mask`, when given, maps row positions back to the unmasked row index
/// reported in the error.
///
/// # Errors
/// - `AssessError::InvalidOneHot` for the first offending row.
pub fn check_one_hot(rows: ArrayView2<'_, f64>, mask: Option<&Slicer>) -> AssessResult<()> {
    let original = mask.map(Slicer::indices);
    for (i, row) in rows.outer_iter().enumerate() {
        let ones = row.iter().filter(|&&v| v == 1.0).count();
        let zeros = row.iter().filter(|&&v| v == 0.0).count();
        if ones != 1 || ones + zeros != row.len() {
            let row_index = original.as_ref().map_or(i, |idx| idx[i]);
            return Err(AssessError::InvalidOneHot {
                row: row_index,
                reason: format!("{ones} ones and {} other non-zero entries", row.len() - ones - zeros),
            });
        }
    }
    Ok(())
}

/// Aligned fitted and observed values for one assessment.
///
/// Only built through validating constructors: both vectors have the same
/// length and every entry is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FitObs {
    fit: Array1<f64>,
    obs: Array1<f64>,
}

impl FitObs {
    /// # Errors
    /// - `AssessError::LengthMismatch` / `AssessError::NonFiniteValue` from
    ///   [`validate_pair`].
    pub fn new(fit: Array1<f64>, obs: Array1<f64>) -> AssessResult<Self> {
        validate_pair(fit.view(), obs.view())?;
        Ok(Self { fit, obs })
    }

    /// Coalesce class probabilities and a one-hot observed matrix over the
    /// same target set.
    ///
    /// # Errors
    /// - `AssessError::LengthMismatch` if the matrices differ in shape.
    /// - Anything [`coalesce`] or [`FitObs::new`] rejects.
    pub fn categorical(
        probabilities: ArrayView2<'_, f64>, one_hot: ArrayView2<'_, f64>, targets: &TargetSet,
        mask: Option<&Slicer>,
    ) -> AssessResult<Self> {
        if probabilities.dim() != one_hot.dim() {
            return Err(AssessError::LengthMismatch {
                what: "observed one-hot rows",
                expected: probabilities.nrows(),
                found: one_hot.nrows(),
            });
        }
        let fit = coalesce(probabilities, targets, ScoreSource::Scores, mask)?;
        let obs = coalesce(one_hot, targets, ScoreSource::OneHot, mask)?;
        Self::new(fit, obs)
    }

    /// Un-normalize model-space fitted and observed values of a continuous
    /// target (`x·std + mean`).
    ///
    /// # Errors
    /// - Mask or pair validation failures.
    pub fn continuous(
        fit: ArrayView1<'_, f64>, obs: ArrayView1<'_, f64>, normalization: &Normalization,
        mask: Option<&Slicer>,
    ) -> AssessResult<Self> {
        let (fit, obs) = match mask {
            Some(mask) => (mask.select(fit)?, mask.select(obs)?),
            None => (fit.to_owned(), obs.to_owned()),
        };
        Self::new(normalization.unnormalize(&fit), normalization.unnormalize(&obs))
    }

    pub fn fit(&self) -> ArrayView1<'_, f64> {
        self.fit.view()
    }

    pub fn obs(&self) -> ArrayView1<'_, f64> {
        self.obs.view()
    }

    pub fn len(&self) -> usize {
        self.fit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fit.is_empty()
    }

    /// Keep the rows selected by `mask`.
    ///
    /// # Errors
    /// - `AssessError::LengthMismatch` unless the mask covers this pair.
    pub fn restrict(&self, mask: &Slicer) -> AssessResult<Self> {
        Ok(Self { fit: mask.select(self.fit.view())?, obs: mask.select(self.obs.view())? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The all-columns identity on probability and one-hot matrices.
    // - Target-set validation and masked coalescing.
    // - One-hot checking and continuous un-normalization.
    // -------------------------------------------------------------------------

    fn probs() -> ndarray::Array2<f64> {
        array![[0.2, 0.3, 0.5], [0.6, 0.1, 0.3], [0.1, 0.1, 0.8]]
    }

    fn one_hot() -> ndarray::Array2<f64> {
        array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    #[test]
    // Purpose
    // -------
    // Summing all columns gives ones for both kinds of matrix.
    //
    // Given
    // -----
    // - A 3 × 3 probability matrix and a 3 × 3 one-hot matrix.
    //
    // Expect
    // ------
    // - Both coalesce to (1, 1, 1).
    fn all_columns_sum_to_one() {
        let all = TargetSet::all(3).unwrap();

        let p = coalesce(probs().view(), &all, ScoreSource::Scores, None).unwrap();
        let h = coalesce(one_hot().view(), &all, ScoreSource::OneHot, None).unwrap();

        for v in p.iter().chain(h.iter()) {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // A target subset with a mask yields fit mass and an indicator.
    //
    // Given
    // -----
    // - Targets {0, 1}, mask keeping rows 0 and 2.
    //
    // Expect
    // ------
    // - fit (0.5, 0.2), obs (0, 1).
    fn categorical_pair_over_subset_and_mask() {
        let targets = TargetSet::new(&[1, 0], 3).unwrap();
        let mask = Slicer::from_mask(vec![true, false, true]);

        let pair = FitObs::categorical(probs().view(), one_hot().view(), &targets, Some(&mask))
            .unwrap();

        assert!((pair.fit()[0] - 0.5).abs() < 1e-12);
        assert!((pair.fit()[1] - 0.2).abs() < 1e-12);
        assert_eq!(pair.obs(), array![0.0, 1.0]);
        assert_eq!(targets.columns(), &[0, 1]);
    }

    #[test]
    // Purpose
    // -------
    // Target sets reject empty, duplicate, and out-of-range columns.
    //
    // Given
    // -----
    // - `[]`, `[1, 1]`, `[3]` for width 3.
    //
    // Expect
    // ------
    // - The three configuration errors.
    fn target_set_validation() {
        assert_eq!(TargetSet::new(&[], 3), Err(AssessError::EmptyTargetSet));
        assert_eq!(
            TargetSet::new(&[1, 1], 3),
            Err(AssessError::DuplicateTargetColumn { index: 1 })
        );
        let err = TargetSet::new(&[3], 3).unwrap_err();
        assert_eq!(err, AssessError::InvalidTargetColumn { index: 3, columns: 3 });
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    // Purpose
    // -------
    // Malformed one-hot rows are reported with their dataset row index.
    //
    // Given
    // -----
    // - Row 2 holds (0.5, 0.5, 0) and the mask keeps rows 1 and 2.
    //
    // Expect
    // ------
    // - `InvalidOneHot { row: 2, .. }`.
    fn one_hot_rows_are_checked() {
        let bad = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5, 0.0]];
        let mask = Slicer::from_mask(vec![false, true, true]);

        let err = coalesce(bad.view(), &TargetSet::all(3).unwrap(), ScoreSource::OneHot, Some(&mask))
            .unwrap_err();

        assert!(matches!(err, AssessError::InvalidOneHot { row: 2, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Continuous pairs come back in natural units.
    //
    // Given
    // -----
    // - Normalization (mean 10, std 2), fit (0, 1), obs (−1, 0.5).
    //
    // Expect
    // ------
    // - fit (10, 12), obs (8, 11).
    fn continuous_pair_is_unnormalized() {
        let norm = Normalization::new(10.0, 2.0).unwrap();

        let pair = FitObs::continuous(
            array![0.0, 1.0].view(),
            array![-1.0, 0.5].view(),
            &norm,
            None,
        )
        .unwrap();

        assert_eq!(pair.fit(), array![10.0, 12.0]);
        assert_eq!(pair.obs(), array![8.0, 11.0]);
    }
}
