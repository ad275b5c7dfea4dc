//! bias::objective — squared distance between average re-scored class
//! shares and the target rates.
//!
//! `SSE(b) = Σ_j (avgP(j; b) − t_j)²` over all `m` classes, where
//! `avgP(·; b)` comes from [`LogOddsMatrix::average_probabilities`]. The
//! objective supplies no analytic gradient, so the minimizer differences it.
use ndarray::{Array1, ArrayView1};

use crate::{
    bias::{
        errors::{BiasError, BiasResult},
        log_odds::LogOddsMatrix,
        target_rates::TargetRates,
    },
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{
            traits::Objective,
            types::{Cost, Theta},
            validation::validate_theta,
        },
    },
};

/// Sum-of-squares objective over the free biases `b ∈ ℝ^{m−1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasObjective {
    targets: TargetRates,
}

impl BiasObjective {
    /// # Errors
    /// - `BiasError::TargetRateMismatch` if the rates do not cover exactly
    ///   the classes behind `log_odds`.
    pub fn new(targets: TargetRates, log_odds: &LogOddsMatrix) -> BiasResult<Self> {
        if targets.len() != log_odds.classes() {
            return Err(BiasError::TargetRateMismatch {
                expected: log_odds.classes(),
                found: targets.len(),
            });
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &TargetRates {
        &self.targets
    }

    /// Evaluate `SSE(b)`.
    ///
    /// # Errors
    /// - `BiasError::BiasLengthMismatch` unless `b.len() == m − 1`.
    pub fn sse(&self, log_odds: &LogOddsMatrix, b: ArrayView1<'_, f64>) -> BiasResult<f64> {
        let avg = log_odds.average_probabilities(b)?;
        Ok((&avg - &self.targets.view()).mapv(|d| d * d).sum())
    }

    /// Closed-form start `b0_j = ln(t_j / t_{m−1}) − Σ_i L(i, j) / n`.
    pub fn starting_point(&self, log_odds: &LogOddsMatrix) -> Theta {
        let n = log_odds.nrows() as f64;
        let t_ref = self.targets.reference();
        let rates = self.targets.view();
        let sums = log_odds.column_sums();
        Array1::from_shape_fn(log_odds.dim(), |j| (rates[j] / t_ref).ln() - sums[j] / n)
    }
}

impl Objective for BiasObjective {
    type Data = LogOddsMatrix;

    fn value(&self, theta: &Theta, data: &LogOddsMatrix) -> OptResult<Cost> {
        self.sse(data, theta.view()).map_err(|e| match e {
            BiasError::BiasLengthMismatch { expected, found } => {
                OptError::ThetaLengthMismatch { expected, actual: found }
            }
            _ => OptError::UnknownError,
        })
    }

    fn check(&self, theta: &Theta, data: &LogOddsMatrix) -> OptResult<()> {
        validate_theta(theta, data.dim())
    }
}
