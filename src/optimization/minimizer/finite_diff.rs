//! minimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradients and Hessians around a parameter
//! vector, with validation and symmetry cleanup, so the adapter can hand
//! Newton-CG second-order information for objectives that only expose a
//! value.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient with error capture and
//!   post-hoc validation.
//! - [`compute_hessian`]: central-difference Hessian of a gradient function,
//!   falling back to forward differences when validation fails, then
//!   symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during differencing is routed into a
//!   shared `closure_err` cell and treated as a hard failure.
//! - Returned gradients satisfy [`validate_grad`]; returned Hessians satisfy
//!   [`validate_hessian`] and are exactly symmetric.
//!
//! Conventions
//! -----------
//! - Domain errors are surfaced as [`OptError`](crate::optimization::errors::OptError)
//!   via `OptResult<T>`; `argmin`'s [`Error`] is confined to the closure
//!   boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests cover successful and failing paths for both helpers and the
//!   in-place symmetrization.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point at which the gradient is approximated.
/// - `func`: `&G`
///   Objective closure. It is expected to park any evaluation error in
///   `closure_err` and return `NaN`.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Shared error slot; cleared on entry and inspected after differencing.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   The validated forward-difference gradient.
///
/// Errors
/// ------
/// - The error captured in `closure_err`, converted into `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient function; each component is differenced numerically.
/// - `theta`: `&Theta`
///   Point at which the Hessian is approximated.
///
/// Returns
/// -------
/// `OptResult<Hessian>`
///   A `dim × dim` symmetric matrix with finite entries.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation. The central
///   validation error is discarded.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Replace each off-diagonal pair with its average; the diagonal is untouched.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use argmin::core::ArgminError;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Forward-difference gradients with and without closure errors.
    // - Validation failures for non-finite gradients and Hessians.
    // - Symmetry of returned Hessians.
    //
    // They intentionally DO NOT cover:
    // - Full Newton-CG runs (see `api` tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The gradient of a squared share deviation matches its closed form.
    //
    // Given
    // -----
    // - `f(b) = (σ(b) − 0.3)²` at b = 0, where σ is the logistic function.
    //
    // Expect
    // ------
    // - Gradient ≈ 2·(0.5 − 0.3)·0.25 = 0.1.
    fn share_deviation_gradient_matches_closed_form() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |b: &Theta| {
            let share = 1.0 / (1.0 + (-b[0]).exp());
            (share - 0.3).powi(2)
        };

        // Act
        let grad = run_fd_diff(&theta, &f, &closure_err).expect("gradient of share deviation");

        // Assert
        assert_eq!(grad.len(), 1);
        assert!((grad[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An error parked by the closure surfaces as an `OptError`.
    //
    // Given
    // -----
    // - A closure that stores `ArgminError::NotImplemented` and returns NaN.
    //
    // Expect
    // ------
    // - `OptError::NotImplemented`.
    fn parked_closure_error_surfaces() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            let argmin_err = ArgminError::NotImplemented { text: "share objective".to_string() };
            closure_err.replace(Some(argmin_err.into()));
            f64::NAN
        };

        // Act
        let err = run_fd_diff(&theta, &f, &closure_err).expect_err("closure error must surface");

        // Assert
        assert_eq!(err, OptError::NotImplemented { text: "share objective".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // A NaN objective produces `InvalidGradient`.
    //
    // Given
    // -----
    // - `f(θ) = NaN`.
    //
    // Expect
    // ------
    // - `OptError::InvalidGradient`.
    fn nan_objective_is_invalid_gradient() {
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| f64::NAN;

        let err = run_fd_diff(&theta, &f, &closure_err).expect_err("NaN gradient");

        assert!(matches!(err, OptError::InvalidGradient { .. }));
    }

    #[test]
    // Purpose
    // -------
    // A linear gradient map yields its constant Jacobian, symmetrized.
    //
    // Given
    // -----
    // - `g(θ) = (2θ₀ + θ₁, θ₀ + 4θ₁)`.
    //
    // Expect
    // ------
    // - Hessian ≈ [[2, 1], [1, 4]], exactly symmetric.
    fn linear_gradient_gives_constant_symmetric_hessian() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64, 2.0]);
        let grad_fn = |t: &Theta| Array1::from(vec![2.0 * t[0] + t[1], t[0] + 4.0 * t[1]]);

        // Act
        let hess = compute_hessian(&grad_fn, &theta).expect("hessian of linear map");

        // Assert
        assert_eq!(hess.shape(), &[2, 2]);
        assert_eq!(hess[[0, 1]], hess[[1, 0]]);
        assert!((hess[[0, 0]] - 2.0).abs() < 1e-5);
        assert!((hess[[0, 1]] - 1.0).abs() < 1e-5);
        assert!((hess[[1, 1]] - 4.0).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Both central and forward paths failing surfaces `InvalidHessian`.
    //
    // Given
    // -----
    // - A gradient function returning NaN.
    //
    // Expect
    // ------
    // - `OptError::InvalidHessian`.
    fn nan_gradient_is_invalid_hessian() {
        let theta: Theta = Array1::from(vec![0.0_f64]);
        let grad_fn = |_theta: &Theta| Array1::from(vec![f64::NAN]);

        let err = compute_hessian(&grad_fn, &theta).expect_err("NaN Hessian");

        assert!(matches!(err, OptError::InvalidHessian { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Symmetrization averages off-diagonal pairs and keeps the diagonal.
    //
    // Given
    // -----
    // - [[1, 2], [0, 3]].
    //
    // Expect
    // ------
    // - [[1, 1], [1, 3]].
    fn symmetrization_averages_off_diagonal_pairs() {
        let mut h: Hessian = Array2::from_shape_vec((2, 2), vec![1.0_f64, 2.0, 0.0, 3.0]).unwrap();

        symmetrize_hess(&mut h);

        assert_eq!(h, Array2::from_shape_vec((2, 2), vec![1.0, 1.0, 1.0, 3.0]).unwrap());
    }
}
