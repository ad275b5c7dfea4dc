//! bias::optimizer — minimize the bias objective from its closed-form start.
//!
//! Newton-CG with finite-difference derivatives runs from `b0`. The solve is
//! accepted only when the solver reports convergence and the result is no
//! worse than leaving the model unchanged (`SSE(b*) ≤ SSE(0)`); anything
//! else is an `OptimizationFailed` carrying the best objective value seen.
use ndarray::Array1;
use slog::{Logger, debug, info, warn};

use crate::{
    bias::{
        errors::{BiasError, BiasResult},
        log_odds::LogOddsMatrix,
        objective::BiasObjective,
        target_rates::TargetRates,
    },
    optimization::minimizer::{MinimizeOutcome, MinimizerOptions, minimize},
};

/// Result of a successful bias solve.
///
/// - `adjustment`: `b*`, one additive shift per non-reference class.
/// - `sse` / `sse_at_zero` / `sse_at_start`: objective at `b*`, `0`, `b0`.
/// - `start`: the closed-form starting point `b0`.
/// - `average_probabilities`: `avgP(·; b*)` over all `m` classes.
/// - `outcome`: solver diagnostics; `None` when `b0` already met the
///   configured target cost and no iterations were needed.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasSolution {
    pub adjustment: Array1<f64>,
    pub sse: f64,
    pub sse_at_zero: f64,
    pub sse_at_start: f64,
    pub start: Array1<f64>,
    pub average_probabilities: Array1<f64>,
    pub outcome: Option<MinimizeOutcome>,
}

/// Solve for the bias shifts that align average class shares with
/// `targets`.
///
/// # Errors
/// - `BiasError::TargetRateMismatch` if `targets` does not have `m` entries.
/// - `BiasError::OptimizationFailed` when the solver errors, stops without
///   converging, or ends above `SSE(0)`.
pub fn solve_bias(
    log_odds: &LogOddsMatrix, targets: TargetRates, opts: &MinimizerOptions, log: &Logger,
) -> BiasResult<BiasSolution> {
    let objective = BiasObjective::new(targets, log_odds)?;
    let zero = Array1::<f64>::zeros(log_odds.dim());
    let sse_at_zero = objective.sse(log_odds, zero.view())?;
    let start = objective.starting_point(log_odds);
    let sse_at_start = objective.sse(log_odds, start.view())?;
    debug!(log, "bias objective ready";
        "classes" => log_odds.classes(),
        "rows" => log_odds.nrows(),
        "sse_at_zero" => sse_at_zero,
        "sse_at_start" => sse_at_start);

    if opts.tols.target_cost.is_some_and(|target| sse_at_start <= target) {
        info!(log, "starting point meets target cost"; "sse" => sse_at_start);
        return finish(&objective, log_odds, start.clone(), start, sse_at_zero, sse_at_start, None);
    }

    let outcome = minimize(&objective, start.clone(), log_odds, opts, log).map_err(|e| {
        warn!(log, "bias solver failed"; "error" => %e);
        BiasError::OptimizationFailed {
            reason: e.to_string(),
            best_sse: sse_at_start.min(sse_at_zero),
        }
    })?;
    if !outcome.converged {
        return Err(BiasError::OptimizationFailed {
            reason: format!("solver stopped without converging: {}", outcome.status),
            best_sse: outcome.value,
        });
    }
    if outcome.value > sse_at_zero {
        return Err(BiasError::OptimizationFailed {
            reason: format!("adjusted fit {} is worse than unadjusted {sse_at_zero}", outcome.value),
            best_sse: outcome.value,
        });
    }
    info!(log, "bias solved";
        "iterations" => outcome.iterations,
        "sse" => outcome.value,
        "sse_at_zero" => sse_at_zero);
    let adjustment = outcome.theta_hat.clone();
    finish(&objective, log_odds, adjustment, start, sse_at_zero, sse_at_start, Some(outcome))
}

fn finish(
    objective: &BiasObjective, log_odds: &LogOddsMatrix, adjustment: Array1<f64>,
    start: Array1<f64>, sse_at_zero: f64, sse_at_start: f64, outcome: Option<MinimizeOutcome>,
) -> BiasResult<BiasSolution> {
    let sse = objective.sse(log_odds, adjustment.view())?;
    let average_probabilities = log_odds.average_probabilities(adjustment.view())?;
    Ok(BiasSolution {
        adjustment,
        sse,
        sse_at_zero,
        sse_at_start,
        start,
        average_probabilities,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bias::probabilities::ProbabilityMatrix, errors::ErrorKind, logging::discard_logger,
        optimization::minimizer::Tolerances,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Solving a varied 3-class problem to the target shares.
    // - The shortcut when b0 is already exact.
    // - Reporting exhausted iterations as `OptimizationFailed`.
    // -------------------------------------------------------------------------

    fn varied_log_odds() -> LogOddsMatrix {
        let rows: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let a = 0.05 + 0.01 * (i % 7) as f64;
                let b = 0.20 + 0.02 * (i % 5) as f64;
                vec![a, b, 1.0 - a - b]
            })
            .collect();
        LogOddsMatrix::from_probabilities(&ProbabilityMatrix::from_rows(&rows).unwrap()).unwrap()
    }

    fn targets() -> TargetRates {
        TargetRates::new(array![0.15, 0.15, 0.70], 3, 1e-6).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The solver pulls average shares onto the targets and never worsens
    // the fit.
    //
    // Given
    // -----
    // - 30 varied rows and targets (0.15, 0.15, 0.70).
    //
    // Expect
    // ------
    // - `avgP(b*)` within 1e-6 of the targets and `sse ≤ sse_at_zero`.
    fn solve_bias_hits_target_shares() {
        // Arrange
        let l = varied_log_odds();
        let opts = MinimizerOptions::default();

        // Act
        let sol = solve_bias(&l, targets(), &opts, &discard_logger()).unwrap();

        // Assert
        assert!(sol.sse <= sol.sse_at_zero);
        for (got, want) in sol.average_probabilities.iter().zip([0.15, 0.15, 0.70]) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
        assert!(sol.outcome.as_ref().is_some_and(|o| o.converged));
    }

    #[test]
    // Purpose
    // -------
    // An exact starting point skips the solver when a target cost is set.
    //
    // Given
    // -----
    // - Identical rows, so b0 reproduces the targets; target cost 1e-16.
    //
    // Expect
    // ------
    // - `outcome` is `None` and `adjustment == start`.
    fn exact_start_skips_solver() {
        let p = ProbabilityMatrix::from_rows(&vec![vec![0.2, 0.2, 0.6]; 5]).unwrap();
        let l = LogOddsMatrix::from_probabilities(&p).unwrap();
        let mut opts = MinimizerOptions::default();
        opts.tols = opts.tols.with_target_cost(1e-16).unwrap();

        let sol = solve_bias(&l, targets(), &opts, &discard_logger()).unwrap();

        assert!(sol.outcome.is_none());
        assert_eq!(sol.adjustment, sol.start);
        assert!(sol.sse < 1e-16);
    }

    #[test]
    // Purpose
    // -------
    // Running out of iterations is a convergence failure, not a result.
    //
    // Given
    // -----
    // - `max_iter = 1` and a cost tolerance far below reach.
    //
    // Expect
    // ------
    // - `OptimizationFailed` with a finite best SSE, kind `Convergence`.
    fn exhausted_iterations_fail() {
        let l = varied_log_odds();
        let mut opts = MinimizerOptions::default();
        opts.tols = Tolerances::new(Some(1e-300), Some(1)).unwrap();

        let err = solve_bias(&l, targets(), &opts, &discard_logger()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Convergence);
        assert!(matches!(
            err,
            BiasError::OptimizationFailed { best_sse, .. } if best_sse.is_finite()
        ));
    }
}
