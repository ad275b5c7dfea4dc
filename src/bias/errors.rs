//! bias::errors — error surface for bias correction.
//!
//! Purpose
//! -------
//! Classify every way bias correction can fail into the crate's
//! [`ErrorKind`] categories: unusable probabilities (input quality),
//! inconsistent model/targets (configuration), solver failure (convergence),
//! and storage failure (persistence).
//!
//! Conventions
//! -----------
//! - Configuration errors are raised before any numerical work starts.
//! - `OptimizationFailed` always carries the best SSE known at the point of
//!   failure.
//! - Lower layers bridge in through `From<ModelError>` and `From<DataError>`.
//!   Solver errors are wrapped explicitly by the optimizer so they can be
//!   annotated with the SSE.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{
    data::errors::DataError,
    errors::ErrorKind,
    model::{errors::ModelError, layers::Activation},
};

pub type BiasResult<T> = Result<T, BiasError>;

#[derive(Debug, Clone, PartialEq)]
pub enum BiasError {
    // ---- Input quality ----
    /// A probability used by the log-odds transform is outside (0, 1).
    DegenerateProbability { row: usize, col: usize, value: f64 },
    /// A probability row is non-finite, out of [0, 1], or does not sum to 1.
    InvalidProbabilities { row: usize, reason: String },
    /// The probability matrix has no rows or no columns.
    EmptyProbabilities,
    /// A reference dataset used for observed frequencies has no usable rows.
    EmptyReference,
    /// A row of an observed one-hot reference matrix is not one-hot.
    InvalidReferenceOneHot { row: usize, reason: String },

    // ---- Configuration ----
    /// Fewer than two classes; there is nothing to rebalance.
    NotCategorical { classes: usize },
    /// The output layer does not use a softmax activation.
    UnsupportedOutputActivation { layer: String, activation: Activation },
    /// Number of target rates differs from the class count.
    TargetRateMismatch { expected: usize, found: usize },
    /// A target rate is outside (0, 1) or non-finite.
    InvalidTargetRate { index: usize, value: f64 },
    /// Target rates do not sum to 1 within the configured tolerance.
    TargetRatesDoNotSumToOne { sum: f64, tolerance: f64 },
    /// A rate-table or observed level is not a class of the model.
    UnknownTargetLevel { level: String },
    /// A rate-table level appears more than once.
    DuplicateTargetLevel { level: String },
    /// Model class count and probability columns disagree.
    ClassCountMismatch { model: usize, probabilities: usize },
    /// Output bias length does not match the adjustment.
    BiasLengthMismatch { expected: usize, found: usize },
    /// Rate tolerance must be finite and positive.
    InvalidRateTolerance { value: f64 },

    // ---- Convergence ----
    /// The solver failed or stopped without converging.
    OptimizationFailed { reason: String, best_sse: f64 },

    // ---- Lower layers ----
    Model(ModelError),
    Data(DataError),
}

impl BiasError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BiasError::DegenerateProbability { .. }
            | BiasError::InvalidProbabilities { .. }
            | BiasError::EmptyProbabilities
            | BiasError::EmptyReference
            | BiasError::InvalidReferenceOneHot { .. } => ErrorKind::InputQuality,
            BiasError::OptimizationFailed { .. } => ErrorKind::Convergence,
            BiasError::Model(err) => err.kind(),
            BiasError::Data(err) => err.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for BiasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BiasError::Model(err) => Some(err),
            BiasError::Data(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for BiasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input quality ----
            BiasError::DegenerateProbability { row, col, value } => write!(
                f,
                "Degenerate probability {value} at row {row}, column {col}: must lie strictly in (0, 1)"
            ),
            BiasError::InvalidProbabilities { row, reason } => {
                write!(f, "Invalid probabilities in row {row}: {reason}")
            }
            BiasError::EmptyProbabilities => write!(f, "Probability matrix is empty"),
            BiasError::EmptyReference => {
                write!(f, "Reference data has no rows with a known class")
            }
            BiasError::InvalidReferenceOneHot { row, reason } => {
                write!(f, "Observed reference row {row} is not one-hot: {reason}")
            }

            // ---- Configuration ----
            BiasError::NotCategorical { classes } => {
                write!(f, "Bias correction needs at least 2 classes, found {classes}")
            }
            BiasError::UnsupportedOutputActivation { layer, activation } => write!(
                f,
                "Output layer '{layer}' uses {activation} activation; only softmax can be bias corrected"
            ),
            BiasError::TargetRateMismatch { expected, found } => {
                write!(f, "Expected {expected} target rates, found {found}")
            }
            BiasError::InvalidTargetRate { index, value } => {
                write!(f, "Target rate {value} at index {index} must lie strictly in (0, 1)")
            }
            BiasError::TargetRatesDoNotSumToOne { sum, tolerance } => {
                write!(f, "Target rates sum to {sum}, expected 1 within {tolerance}")
            }
            BiasError::UnknownTargetLevel { level } => {
                write!(f, "Target level '{level}' is not a class of the model")
            }
            BiasError::DuplicateTargetLevel { level } => {
                write!(f, "Target level '{level}' appears more than once")
            }
            BiasError::ClassCountMismatch { model, probabilities } => write!(
                f,
                "Model has {model} classes but the probability matrix has {probabilities} columns"
            ),
            BiasError::BiasLengthMismatch { expected, found } => {
                write!(f, "Output bias has {found} entries, expected {expected}")
            }
            BiasError::InvalidRateTolerance { value } => {
                write!(f, "Invalid rate tolerance {value}: must be finite and > 0")
            }

            // ---- Convergence ----
            BiasError::OptimizationFailed { reason, best_sse } => {
                write!(f, "Bias optimization failed ({reason}); best SSE {best_sse:e}")
            }

            // ---- Lower layers ----
            BiasError::Model(err) => write!(f, "Model error: {err}"),
            BiasError::Data(err) => write!(f, "Data error: {err}"),
        }
    }
}

impl From<ModelError> for BiasError {
    fn from(err: ModelError) -> Self {
        BiasError::Model(err)
    }
}

impl From<DataError> for BiasError {
    fn from(err: DataError) -> Self {
        BiasError::Data(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<BiasError> for PyErr {
    fn from(err: BiasError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
