//! Execution helper that runs an `argmin` Newton-CG solver on an objective
//! and returns a crate-friendly [`MinimizeOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        traits::{MinimizeOutcome, MinimizerOptions, Objective},
        types::{NewtonState, Theta},
    },
};
use argmin::core::{CostFunction, Executor, Gradient, Solver, State};
use argmin_math::ArgminL2Norm;
use slog::{Logger, debug};

/// Run a Newton-CG optimization for an objective problem.
///
/// Shared runner for both line-search variants. It sets `theta0` on the
/// solver state, applies `max_iters` and the optional target cost, attaches
/// the `argmin` slog observer when `obs_slog` is enabled and `opts.verbose`
/// is set, runs the solver, and converts the final state into a
/// [`MinimizeOutcome`].
///
/// The initial cost and gradient norm are logged at debug level before the
/// first iteration; the termination status, iteration count, and best cost
/// after the last.
///
/// # Errors
/// - Cost or gradient failures at `theta0`.
/// - Any `argmin` runtime error (line-search failures, objective errors
///   raised mid-run) via `From<argmin::core::Error>`.
/// - Validation errors while building the outcome.
pub fn run_newton<'a, F, S>(
    theta0: Theta, opts: &MinimizerOptions, problem: ArgMinAdapter<'a, F>, solver: S,
    log: &Logger,
) -> OptResult<MinimizeOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, NewtonState>,
{
    log_initial_state(&theta0, &problem, log)?;
    let mut optimizer = Executor::new(problem, solver);
    let max_iter = opts.tols.max_iter as u64;
    let target_cost = opts.tols.target_cost.unwrap_or(f64::NEG_INFINITY);
    optimizer = optimizer
        .configure(|state| state.param(theta0).max_iters(max_iter).target_cost(target_cost));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let outcome = MinimizeOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )?;
    debug!(log, "newton-cg finished";
        "status" => &outcome.status,
        "iterations" => outcome.iterations,
        "cost" => outcome.value,
        "converged" => outcome.converged);
    Ok(outcome)
}

// ---- Helper Methods ----

fn log_initial_state<F: Objective>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>, log: &Logger,
) -> OptResult<()> {
    let c0 = problem.cost(theta0)?;
    let g0n = problem.gradient(theta0)?.l2_norm();
    debug!(log, "newton-cg start"; "dim" => theta0.len(), "cost" => c0, "grad_norm" => g0n);
    Ok(())
}
