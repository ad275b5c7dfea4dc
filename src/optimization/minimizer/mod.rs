//! minimizer — argmin-powered Newton-CG minimizer with finite-difference
//! derivatives.
//!
//! Purpose
//! -------
//! Minimize a smooth scalar objective `c(θ)` over an unconstrained parameter
//! vector. Callers implement [`Objective`] and invoke [`minimize`]; when the
//! objective provides no analytic gradient, both gradient and Hessian are
//! obtained by finite differences.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] exposes an [`Objective`] to `argmin` as a
//!   cost, gradient, and Hessian problem.
//! - [`builders`] construct Newton-CG with a More–Thuente or Hager–Zhang
//!   line search and apply tolerances.
//! - [`run::run_newton`] executes the solver and normalizes the result into
//!   a [`MinimizeOutcome`].
//! - [`finite_diff`] and [`validation`] keep every derivative finite and
//!   correctly shaped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives report invalid inputs as [`OptError`] values, never panics.
//! - The Hessian handed to the solver is symmetric with finite entries.
//! - `converged` in the outcome is `true` only when the solver's own
//!   stopping rule fired; exhausting `max_iter` is reported as not converged.
//!
//! Downstream usage
//! ----------------
//! - The bias solver implements [`Objective`] for its sum-of-squares
//!   objective and calls [`minimize`] with a closed-form starting point.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover derivative approximations, validation,
//!   option parsing, and end-to-end runs on quadratics with known minima.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    DEFAULT_MAX_ITER, LineSearcher, MinimizeOutcome, MinimizerOptions, Objective, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{
        LineSearcher, MinimizeOutcome, MinimizerOptions, Objective, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
