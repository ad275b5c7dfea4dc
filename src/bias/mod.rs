//! bias — shift a softmax classifier's output biases so its average class
//! shares match known population rates.
//!
//! Purpose
//! -------
//! A classifier trained on a sample whose class mix differs from the
//! population over- or under-predicts some classes on average. Adding a
//! constant to each non-reference class's log-odds corrects the average
//! shares without retraining; the constants are found by minimizing the
//! squared distance between average re-scored shares and the target rates.
//!
//! Key behaviors
//! -------------
//! - [`probabilities::ProbabilityMatrix`] and [`log_odds::LogOddsMatrix`]
//!   hold the validated model output and its log-odds against the last
//!   class.
//! - [`target_rates::TargetRateSource`] makes the origin of the target
//!   shares a caller choice: observed frequencies, a rate table, or a plain
//!   vector.
//! - [`objective::BiasObjective`] and [`optimizer::solve_bias`] define and
//!   minimize `SSE(b)` from a closed-form start.
//! - [`patcher`] checks the softmax precondition, applies `b*` to the output
//!   bias, and persists the result copy-on-write.
//! - [`api::correct_bias`] chains all of the above.
//!
//! Invariants & assumptions
//! ------------------------
//! - The last class is the reference; its bias is never changed.
//! - Configuration errors are raised before any numerical work.
//! - A successful solve never leaves the fit worse than `b = 0`.
//!
//! Testing notes
//! -------------
//! - Each submodule has unit tests; `tests/bias_correction.rs` runs the
//!   three-class scenario end to end.

pub mod api;
pub mod errors;
pub mod log_odds;
pub mod objective;
pub mod optimizer;
pub mod patcher;
pub mod probabilities;
pub mod target_rates;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{
    BiasCorrection, BiasOptions, DEFAULT_COST_TOLERANCE, DEFAULT_TARGET_SSE, correct_bias,
};
pub use self::errors::{BiasError, BiasResult};
pub use self::log_odds::LogOddsMatrix;
pub use self::objective::BiasObjective;
pub use self::optimizer::{BiasSolution, solve_bias};
pub use self::patcher::{check_softmax_output, patch_output_bias, persist_patched};
pub use self::probabilities::ProbabilityMatrix;
pub use self::target_rates::{ObservedFrequencies, RateTable, TargetRateSource, TargetRates};

pub mod prelude {
    pub use super::api::{BiasCorrection, BiasOptions, correct_bias};
    pub use super::errors::{BiasError, BiasResult};
    pub use super::probabilities::ProbabilityMatrix;
    pub use super::target_rates::{ObservedFrequencies, RateTable, TargetRateSource};
}
