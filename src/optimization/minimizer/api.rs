//! High-level entry point for minimizing a user-provided [`Objective`].
//!
//! Selects Newton-CG with either a Hager–Zhang or More–Thuente line search,
//! wraps the objective in an [`ArgMinAdapter`], and delegates to
//! [`run_newton`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_newton,
        traits::{LineSearcher, MinimizeOutcome, MinimizerOptions, Objective},
        types::Theta,
    },
};
use slog::Logger;

/// Minimize `c(θ)` with Newton-CG and the configured line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Builds Newton-CG with the line search named in `opts.line_searcher`.
/// - Runs it through [`run_newton`]; gradients and Hessians fall back to
///   finite differences when the objective provides none.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors (invalid tolerance).
/// - Propagates runtime errors from the solver.
///
/// # Example
/// ```
/// use ndarray::array;
/// use model_calibration::logging::discard_logger;
/// use model_calibration::optimization::errors::OptResult;
/// use model_calibration::optimization::minimizer::{
///     minimize, MinimizerOptions, Objective, Theta,
/// };
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok((theta[0] - 1.0).powi(2) + 2.0 * (theta[1] + 0.5).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.0, 0.0], &(), &MinimizerOptions::default(), &discard_logger())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-4);
/// # Ok::<(), model_calibration::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MinimizerOptions, log: &Logger,
) -> OptResult<MinimizeOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_newton(theta0, opts, problem, solver, log)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_newton(theta0, opts, problem, solver, log)
        }
    }
}
