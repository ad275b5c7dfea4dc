//! minimizer::builders — Newton-CG solver construction helpers.
//!
//! Purpose
//! -------
//! Hide `argmin`'s generic wiring behind two builders, one per supported
//! line search, and apply crate-level options (cost tolerance, curvature
//! threshold) in one shared place.
//!
//! Conventions
//! -----------
//! - Builders never set `theta0` or `max_iters`; the runner owns those.
//! - Invalid tolerances rejected by `argmin` surface as [`OptError`] via
//!   `From<argmin::core::Error>`.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::newton::NewtonCG;

use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::MinimizerOptions,
        types::{Cost, HagerZhangLS, MoreThuenteLS, NewtonHagerZhang, NewtonMoreThuente},
    },
};

/// Construct Newton-CG with a Hager–Zhang line search.
///
/// # Errors
/// Propagates `argmin`'s rejection of the configured cost tolerance.
pub fn build_optimizer_hager_zhang(opts: &MinimizerOptions) -> OptResult<NewtonHagerZhang> {
    let newton = NewtonCG::new(HagerZhangLS::new());
    configure_newton(newton, opts)
}

/// Construct Newton-CG with a More–Thuente line search.
///
/// # Errors
/// Propagates `argmin`'s rejection of the configured cost tolerance.
pub fn build_optimizer_more_thuente(opts: &MinimizerOptions) -> OptResult<NewtonMoreThuente> {
    let newton = NewtonCG::new(MoreThuenteLS::new());
    configure_newton(newton, opts)
}

/// configure_newton — apply optional tolerance and curvature threshold.
///
/// Generic over the line search so both builders share one wiring path.
/// `None` fields leave the solver defaults untouched.
pub fn configure_newton<L>(
    mut newton: NewtonCG<L, Cost>, opts: &MinimizerOptions,
) -> OptResult<NewtonCG<L, Cost>> {
    if let Some(threshold) = opts.curvature_threshold {
        newton = newton.with_curvature_threshold(threshold);
    }
    if let Some(tol) = opts.tols.tol_cost {
        newton = newton.with_tolerance(tol)?;
    }
    Ok(newton)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::minimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Successful construction with default and custom options.
    //
    // They intentionally DO NOT cover:
    // - Solver behavior (see `api` tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders accept default options.
    //
    // Given
    // -----
    // - `MinimizerOptions::default()`.
    //
    // Expect
    // ------
    // - Both builders return `Ok`.
    fn builders_accept_default_options() {
        let opts = MinimizerOptions::default();
        assert!(build_optimizer_more_thuente(&opts).is_ok());
        assert!(build_optimizer_hager_zhang(&opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A custom tolerance and curvature threshold are accepted.
    //
    // Given
    // -----
    // - `tol_cost = 1e-14`, `curvature_threshold = 1e-12`.
    //
    // Expect
    // ------
    // - Construction succeeds.
    fn builders_accept_custom_tolerance_and_threshold() {
        let tols = Tolerances::new(Some(1e-14), Some(25)).expect("valid tolerances");
        let opts = MinimizerOptions::new(tols, LineSearcher::HagerZhang, Some(1e-12), false)
            .expect("valid options");
        assert!(build_optimizer_hager_zhang(&opts).is_ok());
    }
}
