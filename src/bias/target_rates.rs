//! bias::target_rates — population class shares and where they come from.
//!
//! Purpose
//! -------
//! Bias correction pulls the model's average class shares toward a
//! [`TargetRates`] vector. Which source is authoritative is the caller's
//! choice, expressed through the [`TargetRateSource`] strategy:
//!
//! - [`ObservedFrequencies`]: class shares observed in a reference dataset,
//!   either as a one-hot matrix or as a column of class labels.
//! - [`RateTable`]: externally supplied `(level, rate)` rows.
//! - A plain `Array1<f64>` already in class order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every source resolves to exactly `m` rates aligned with the model's
//!   class ordering; [`TargetRates::new`] then checks range and sum.
use std::collections::BTreeMap;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::{
    assessment::{coalesce::check_one_hot, errors::AssessError},
    bias::{
        errors::{BiasError, BiasResult},
        validation::validate_target_rates,
    },
    data::level::{Level, LevelIndex},
};

/// Validated target shares, one per class, each in (0, 1), summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRates {
    rates: Array1<f64>,
}

impl TargetRates {
    /// # Errors
    /// - `TargetRateMismatch`, `InvalidTargetRate`, `TargetRatesDoNotSumToOne`
    ///   from [`validate_target_rates`].
    pub fn new(rates: Array1<f64>, classes: usize, tolerance: f64) -> BiasResult<Self> {
        validate_target_rates(rates.view(), classes, tolerance)?;
        Ok(Self { rates })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.rates.view()
    }

    /// Rate of the reference class (the last one).
    pub fn reference(&self) -> f64 {
        self.rates[self.rates.len() - 1]
    }
}

/// Strategy that produces raw target rates in the model's class order.
pub trait TargetRateSource {
    /// # Errors
    /// Configuration errors when the source cannot be aligned with
    /// `classes`; `EmptyReference` when there is nothing to count.
    fn resolve(&self, classes: &LevelIndex) -> BiasResult<Array1<f64>>;
}

impl TargetRateSource for Array1<f64> {
    fn resolve(&self, _classes: &LevelIndex) -> BiasResult<Array1<f64>> {
        Ok(self.clone())
    }
}

/// Class shares observed in a reference dataset.
///
/// One-hot rows must each hold a single 1; anything else is
/// `InvalidReferenceOneHot`.
#[derive(Debug, Clone)]
pub enum ObservedFrequencies<'a> {
    /// `n × m` one-hot matrix with columns in class order.
    OneHot(ArrayView2<'a, f64>),
    /// One class label per row; missing labels are ignored.
    Labels(&'a [Option<Level>]),
}

impl TargetRateSource for ObservedFrequencies<'_> {
    fn resolve(&self, classes: &LevelIndex) -> BiasResult<Array1<f64>> {
        match self {
            ObservedFrequencies::OneHot(one_hot) => {
                if one_hot.ncols() != classes.len() {
                    return Err(BiasError::TargetRateMismatch {
                        expected: classes.len(),
                        found: one_hot.ncols(),
                    });
                }
                check_one_hot(one_hot.view(), None).map_err(|err| match err {
                    AssessError::InvalidOneHot { row, reason } => {
                        BiasError::InvalidReferenceOneHot { row, reason }
                    }
                    other => BiasError::InvalidReferenceOneHot { row: 0, reason: other.to_string() },
                })?;
                one_hot.mean_axis(Axis(0)).ok_or(BiasError::EmptyReference)
            }
            ObservedFrequencies::Labels(labels) => {
                let mut counts = Array1::<f64>::zeros(classes.len());
                for level in labels.iter().flatten() {
                    let j = classes.index_of(level).ok_or_else(|| {
                        BiasError::UnknownTargetLevel { level: level.to_string() }
                    })?;
                    counts[j] += 1.0;
                }
                let total = counts.sum();
                if total == 0.0 {
                    return Err(BiasError::EmptyReference);
                }
                Ok(counts / total)
            }
        }
    }
}

/// Externally supplied `(level, rate)` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rows: Vec<(Level, f64)>,
}

impl RateTable {
    pub fn new(rows: Vec<(Level, f64)>) -> Self {
        Self { rows }
    }
}

impl TargetRateSource for RateTable {
    /// Map each row's level to its class position.
    ///
    /// # Errors
    /// - `TargetRateMismatch` unless there is exactly one row per class.
    /// - `DuplicateTargetLevel` / `UnknownTargetLevel` for bad levels.
    fn resolve(&self, classes: &LevelIndex) -> BiasResult<Array1<f64>> {
        if self.rows.len() != classes.len() {
            return Err(BiasError::TargetRateMismatch {
                expected: classes.len(),
                found: self.rows.len(),
            });
        }
        let mut by_index: BTreeMap<usize, f64> = BTreeMap::new();
        for (level, rate) in &self.rows {
            let j = classes
                .index_of(level)
                .ok_or_else(|| BiasError::UnknownTargetLevel { level: level.to_string() })?;
            if by_index.insert(j, *rate).is_some() {
                return Err(BiasError::DuplicateTargetLevel { level: level.to_string() });
            }
        }
        Ok(by_index.into_values().collect())
    }
}
