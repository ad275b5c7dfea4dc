//! minimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the Newton-CG
//! minimizer so the rest of the optimizer stays agnostic to `ndarray` and
//! `argmin` generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length equal to the number of free parameters;
//!   `Hessian` is dense and square with the same dimension.
//! - `Cost` is the objective value being minimized. No sign flips happen
//!   anywhere in this layer.
//! - The line-search aliases use `argmin`'s three-parameter forms
//!   `(Param, Gradient, Float)`.
use argmin::{
    core::IterState,
    solver::{
        linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
        newton::NewtonCG,
    },
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector `∇c(θ)`, same shape as `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix, `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value being minimized.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`, `"hessian_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Solver state carried by every Newton-CG run in this crate.
pub type NewtonState = IterState<Theta, Grad, (), Hessian, (), Cost>;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// Newton-CG wired to the Hager–Zhang line search.
pub type NewtonHagerZhang = NewtonCG<HagerZhangLS, Cost>;

/// Newton-CG wired to the More–Thuente line search.
pub type NewtonMoreThuente = NewtonCG<MoreThuenteLS, Cost>;
