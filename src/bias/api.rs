//! bias::api — end-to-end bias correction of a softmax classifier.
//!
//! [`correct_bias`] runs, in order:
//! 1. configuration checks (softmax output, categorical target, class
//!    counts, target rates, destination outside the source), all before any
//!    numerical work;
//! 2. the log-odds transform of the model's probabilities;
//! 3. the Newton-CG solve from the closed-form start;
//! 4. the in-memory output-bias patch;
//! 5. copy-on-write persistence into `dest_dir`.
//!
//! Any failure aborts the whole operation; nothing is retried and the
//! source directory is never written. A failed persist restores the
//! model's original output bias.
use std::path::{Path, PathBuf};

use slog::{Logger, info, warn};

use crate::{
    bias::{
        errors::{BiasError, BiasResult},
        log_odds::LogOddsMatrix,
        optimizer::{BiasSolution, solve_bias},
        patcher::{check_softmax_output, patch_output_bias, persist_patched},
        probabilities::ProbabilityMatrix,
        target_rates::{TargetRateSource, TargetRates},
        validation::{DEFAULT_RATE_TOLERANCE, verify_rate_tolerance},
    },
    data::level::LevelIndex,
    model::{Classifier, check_destination},
    optimization::minimizer::{DEFAULT_MAX_ITER, MinimizerOptions, Tolerances},
};

/// Default target cost for the bias solve: below this SSE the average
/// shares are within 1e-6 of the targets.
pub const DEFAULT_TARGET_SSE: f64 = 1e-12;

/// Default cost-change tolerance for the bias solve. Finite-difference
/// derivatives leave the SSE jittering around 1e-15 near an exact fit; a
/// change below this value counts as converged.
pub const DEFAULT_COST_TOLERANCE: f64 = 1e-14;

/// Configuration for [`correct_bias`].
///
/// - `minimizer`: Newton-CG settings; the default carries a target cost of
///   [`DEFAULT_TARGET_SSE`] and a cost tolerance of [`DEFAULT_COST_TOLERANCE`].
/// - `rate_tolerance`: allowed `|Σ t_j − 1|` for resolved target rates.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasOptions {
    pub minimizer: MinimizerOptions,
    pub rate_tolerance: f64,
}

impl BiasOptions {
    /// # Errors
    /// - `BiasError::InvalidRateTolerance` unless finite and positive.
    pub fn new(minimizer: MinimizerOptions, rate_tolerance: f64) -> BiasResult<Self> {
        verify_rate_tolerance(rate_tolerance)?;
        Ok(Self { minimizer, rate_tolerance })
    }
}

impl Default for BiasOptions {
    fn default() -> Self {
        let tols = Tolerances {
            tol_cost: Some(DEFAULT_COST_TOLERANCE),
            max_iter: DEFAULT_MAX_ITER,
            target_cost: Some(DEFAULT_TARGET_SSE),
        };
        Self {
            minimizer: MinimizerOptions { tols, ..MinimizerOptions::default() },
            rate_tolerance: DEFAULT_RATE_TOLERANCE,
        }
    }
}

/// Where the adjusted model went and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasCorrection {
    pub location: PathBuf,
    pub solution: BiasSolution,
}

/// Shift `model`'s output biases so its average class shares over
/// `probabilities` match the rates from `rates`, then persist the adjusted
/// model into `dest_dir` alongside copies of every artifact in `source_dir`.
///
/// `model` is patched in place; callers must not score with it concurrently.
/// On error the model keeps its original output bias.
///
/// # Errors
/// - Configuration: `UnsupportedOutputActivation`, `NotCategorical`,
///   `ClassCountMismatch`, target-rate errors,
///   `Model(InvalidDestination)`.
/// - Input quality: `DegenerateProbability`.
/// - Convergence: `OptimizationFailed`.
/// - Persistence: `Model(Io | Serialization)`.
pub fn correct_bias<M, S>(
    model: &mut M, probabilities: &ProbabilityMatrix, rates: &S, source_dir: &Path,
    dest_dir: &Path, opts: &BiasOptions, log: &Logger,
) -> BiasResult<BiasCorrection>
where
    M: Classifier + ?Sized,
    S: TargetRateSource + ?Sized,
{
    check_softmax_output(&*model)?;
    let targets = resolve_targets(&*model, probabilities, rates, opts.rate_tolerance)?;
    check_destination(source_dir, dest_dir)?;
    info!(log, "bias correction configured";
        "rows" => probabilities.nrows(),
        "classes" => targets.len());

    let log_odds = LogOddsMatrix::from_probabilities(probabilities)?;
    let solution = solve_bias(&log_odds, targets, &opts.minimizer, log)?;
    let original_bias = model.layers().output().bias.clone();
    patch_output_bias(model, solution.adjustment.view(), log)?;
    match persist_patched(&*model, source_dir, dest_dir, log) {
        Ok(location) => Ok(BiasCorrection { location, solution }),
        Err(err) => {
            model.layers_mut().output_mut().bias = original_bias;
            warn!(log, "persist failed; output bias restored"; "error" => %err);
            Err(err)
        }
    }
}

/// Class levels of a categorical classifier target.
///
/// # Errors
/// - `BiasError::NotCategorical` for continuous targets or fewer than two
///   classes.
pub fn class_levels<M: Classifier + ?Sized>(model: &M) -> BiasResult<&LevelIndex> {
    let target = model.target();
    let levels =
        target.levels().map_err(|_| BiasError::NotCategorical { classes: target.width() })?;
    if levels.len() < 2 {
        return Err(BiasError::NotCategorical { classes: levels.len() });
    }
    Ok(levels)
}

fn resolve_targets<M, S>(
    model: &M, probabilities: &ProbabilityMatrix, rates: &S, tolerance: f64,
) -> BiasResult<TargetRates>
where
    M: Classifier + ?Sized,
    S: TargetRateSource + ?Sized,
{
    verify_rate_tolerance(tolerance)?;
    let levels = class_levels(model)?;
    if probabilities.ncols() != levels.len() {
        return Err(BiasError::ClassCountMismatch {
            model: levels.len(),
            probabilities: probabilities.ncols(),
        });
    }
    TargetRates::new(rates.resolve(levels)?, levels.len(), tolerance)
}
