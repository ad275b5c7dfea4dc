//! Adapter that exposes a user [`Objective`] as an `argmin` problem.
//!
//! The cost is the objective value itself. Gradients come from the
//! objective when it provides one, otherwise from finite differences of the
//! cost; Hessians are always finite differences of that gradient.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    minimizer::{
        finite_diff::{compute_hessian, run_fd_diff},
        traits::Objective,
        types::{Cost, Grad, Hessian as HessianMatrix, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient, Hessian};
use finitediff::FiniteDiff;

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction`, `Gradient`,
/// and `Hessian` traits.
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<F: Objective> Clone for ArgMinAdapter<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Objective> Copy for ArgMinAdapter<'_, F> {}

impl<F: Objective> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ)` and check the result is finite.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `value`, or
    /// `NonFiniteCost` for a NaN/infinite result.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<F: Objective> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// - An analytic gradient from the objective is validated and returned.
    /// - Otherwise central differences of the cost are tried first. If a cost
    ///   evaluation failed during differencing, or the result fails
    ///   validation, forward differences are used instead.
    ///
    /// The FD closure must return `f64`, so the first error raised inside it
    /// is parked in `closure_err` and the closure returns `NaN`.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return Ok(run_fd_diff(theta, &cost_func, &closure_err)?);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<F: Objective> Hessian for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Hessian = HessianMatrix;

    /// Finite-difference Hessian of the gradient at `θ`.
    ///
    /// Any error raised by a gradient evaluation inside the differencing
    /// routine takes precedence over validation of the resulting matrix.
    fn hessian(&self, theta: &Self::Param) -> Result<Self::Hessian, Error> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let grad_func = |theta: &Theta| -> Grad {
            match self.gradient(theta) {
                Ok(g) => g,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    Grad::from_elem(theta.len(), f64::NAN)
                }
            }
        };
        let hessian = compute_hessian(&grad_func, theta);
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        Ok(hessian?)
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user [`Objective`] and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Cost passthrough without sign changes.
    // - Analytic versus finite-difference gradient selection.
    // - Finite-difference Hessians on a known quadratic.
    // - Error propagation out of the differencing closures.
    // -------------------------------------------------------------------------

    /// c(θ) = Σ w_i θ_i², Hessian diag(2 w).
    struct WeightedSquares {
        analytic: bool,
    }

    impl Objective for WeightedSquares {
        type Data = Theta;

        fn value(&self, theta: &Theta, data: &Theta) -> OptResult<Cost> {
            Ok((data * &theta.mapv(|t| t * t)).sum())
        }

        fn check(&self, _theta: &Theta, _data: &Theta) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, data: &Theta) -> OptResult<Grad> {
            if self.analytic { Ok(2.0 * data * theta) } else { Err(OptError::GradientNotImplemented) }
        }
    }

    struct Exploding;

    impl Objective for Exploding {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            if theta[0] > 0.5 {
                Err(OptError::ThetaLengthMismatch { expected: 9, actual: 9 })
            } else {
                Ok(theta[0])
            }
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter minimizes the objective as-is.
    //
    // Given
    // -----
    // - Weighted squares with weights (1, 3) at θ = (1, 1).
    //
    // Expect
    // ------
    // - cost = 4.
    fn cost_returns_objective_value_unchanged() {
        let weights = array![1.0, 3.0];
        let f = WeightedSquares { analytic: false };
        let adapter = ArgMinAdapter::new(&f, &weights);

        let cost = adapter.cost(&array![1.0, 1.0]).expect("finite cost");

        assert_eq!(cost, 4.0);
    }

    #[test]
    // Purpose
    // -------
    // Finite-difference and analytic gradients agree on a smooth quadratic.
    //
    // Given
    // -----
    // - Weighted squares at θ = (0.5, -1.0).
    //
    // Expect
    // ------
    // - FD gradient within 1e-6 of (1.0, -6.0).
    fn fd_gradient_matches_analytic_gradient() {
        let weights = array![1.0, 3.0];
        let theta = array![0.5, -1.0];
        let fd = WeightedSquares { analytic: false };
        let exact = WeightedSquares { analytic: true };

        let g_fd = ArgMinAdapter::new(&fd, &weights).gradient(&theta).expect("fd gradient");
        let g_exact = ArgMinAdapter::new(&exact, &weights).gradient(&theta).expect("gradient");

        for (a, b) in g_fd.iter().zip(g_exact.iter()) {
            assert!((a - b).abs() < 1e-6, "fd {a} vs analytic {b}");
        }
    }

    #[test]
    // Purpose
    // -------
    // The FD Hessian recovers the diagonal curvature of a quadratic.
    //
    // Given
    // -----
    // - Weighted squares with weights (1, 3).
    //
    // Expect
    // ------
    // - Hessian ≈ diag(2, 6), symmetric.
    fn hessian_recovers_quadratic_curvature() {
        let weights = array![1.0, 3.0];
        let f = WeightedSquares { analytic: false };
        let adapter = ArgMinAdapter::new(&f, &weights);

        let h = adapter.hessian(&array![0.2, 0.4]).expect("hessian");

        assert!((h[[0, 0]] - 2.0).abs() < 1e-3);
        assert!((h[[1, 1]] - 6.0).abs() < 1e-3);
        assert!(h[[0, 1]].abs() < 1e-3);
        assert_eq!(h[[0, 1]], h[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // Objective errors inside finite differencing are not swallowed.
    //
    // Given
    // -----
    // - An objective that fails for θ > 0.5, differenced at θ = 0.75.
    //
    // Expect
    // ------
    // - `gradient` returns an error that maps back to the original `OptError`.
    fn gradient_propagates_objective_errors() {
        let f = Exploding;
        let adapter = ArgMinAdapter::new(&f, &());

        let err = adapter.gradient(&array![0.75]).expect_err("objective fails everywhere nearby");

        assert_eq!(
            OptError::from(err),
            OptError::ThetaLengthMismatch { expected: 9, actual: 9 }
        );
    }
}
