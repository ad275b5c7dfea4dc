//! Public API surface for objective minimization.
//!
//! - [`Objective`]: trait callers implement for the function being minimized.
//! - [`MinimizerOptions`] and [`Tolerances`]: configuration for the solver.
//! - [`LineSearcher`]: choice of line search used inside Newton-CG.
//! - [`MinimizeOutcome`]: normalized result returned by [`minimize`].
//!
//! [`minimize`]: crate::optimization::minimizer::minimize
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{Cost, FnEvalMap, Grad, Theta},
        validation::{
            validate_theta_hat, validate_value, verify_curvature_threshold, verify_max_iter,
            verify_target_cost, verify_tol_cost,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented objective interface.
///
/// - `type Data`: payload carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `c(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject obviously invalid
///   `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇c(θ)`.
///   If not implemented, finite differences of `value` are used, and the
///   Hessian is always finite-differenced from whichever gradient is in use.
pub trait Objective {
    type Data;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the Newton-CG solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`); unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Solver configuration.
///
/// Fields:
/// - `tols: Tolerances` — cost-change tolerance and iteration cap.
/// - `line_searcher: LineSearcher` — line search used by Newton-CG.
/// - `curvature_threshold: Option<f64>` — CG stops once `pᵀHp` drops to
///   this level; `None` keeps the solver default of zero.
/// - `verbose: bool` — attaches the `argmin` slog observer when the
///   `obs_slog` feature is enabled.
///
/// Default: `tol_cost = None` (machine epsilon inside the solver),
/// `max_iter = 100`, More–Thuente, no curvature threshold, quiet.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub curvature_threshold: Option<f64>,
    pub verbose: bool,
}

impl MinimizerOptions {
    /// Create a new set of solver options.
    ///
    /// # Errors
    /// - `OptError::InvalidCurvatureThreshold` if the threshold is negative
    ///   or non-finite.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, curvature_threshold: Option<f64>,
        verbose: bool,
    ) -> OptResult<Self> {
        if let Some(value) = curvature_threshold {
            verify_curvature_threshold(value)?;
        }
        Ok(Self { tols, line_searcher, curvature_threshold, verbose })
    }
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            line_searcher: LineSearcher::MoreThuente,
            curvature_threshold: None,
            verbose: false,
        }
    }
}

/// Numerical tolerances and iteration limits.
///
/// - `tol_cost`: terminate when `|c_k − c_{k−1}|` falls below this value.
///   `None` leaves the solver's machine-epsilon default in place.
/// - `max_iter`: hard cap on Newton iterations.
/// - `target_cost`: stop as converged once the best cost reaches this
///   value. `None` disables the check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_cost: Option<f64>,
    pub max_iter: usize,
    pub target_cost: Option<f64>,
}

/// Default Newton iteration cap.
pub const DEFAULT_MAX_ITER: usize = 100;

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::InvalidTolCost`] for non-finite or non-positive `tol_cost`.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(tol_cost: Option<f64>, max_iter: Option<usize>) -> OptResult<Self> {
        verify_tol_cost(tol_cost)?;
        let max_iter = max_iter.unwrap_or(DEFAULT_MAX_ITER);
        verify_max_iter(max_iter)?;
        Ok(Self { tol_cost, max_iter, target_cost: None })
    }

    /// # Errors
    /// - [`OptError::InvalidTargetCost`] for a non-finite target.
    pub fn with_target_cost(mut self, target: f64) -> OptResult<Self> {
        verify_target_cost(target)?;
        self.target_cost = Some(target);
        Ok(self)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_cost: None, max_iter: DEFAULT_MAX_ITER, target_cost: None }
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: objective value at `theta_hat`.
/// - `converged`: `true` only when the solver met its own stopping rule
///   (or a target cost); running out of iterations is not convergence.
/// - `status`: human-readable termination status.
/// - `iterations`: number of Newton iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl MinimizeOutcome {
    /// Build a validated [`MinimizeOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{termination:?}"))
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}
