//! optimization — Newton-CG minimizer and its unified error surface.
//!
//! Purpose
//! -------
//! Provide a self-contained minimization layer: callers implement an
//! objective, choose tolerances, and obtain a fitted parameter vector with
//! diagnostics without touching backend solver details.
//!
//! Conventions
//! -----------
//! - Parameters, gradients, and Hessians use the `ndarray` aliases in
//!   [`minimizer::types`].
//! - Public entrypoints that can fail return [`errors::OptResult`]; callers
//!   never see raw `argmin` errors.
//! - Progress is reported through the `slog::Logger` handed to
//!   [`minimizer::minimize`]; nothing here writes to stdout.

pub mod errors;
pub mod minimizer;

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use model_calibration::optimization::prelude::*;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
}
