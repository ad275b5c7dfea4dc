//! assessment::errors — failures of slicing, coalescing, and fit statistics.
//!
//! Input-quality variants (`InsufficientVariation`, `InsufficientData`,
//! `NonFiniteValue`, `ObservedOutOfRange`, `InvalidOneHot`) describe a
//! single computation that cannot be carried out on the rows it was given;
//! `slice_and_assess` logs and skips the affected slice. Every other
//! variant is a configuration mistake and aborts the run.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{data::errors::DataError, errors::ErrorKind};

pub type AssessResult<T> = Result<T, AssessError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AssessError {
    // ---- Input quality ----
    /// The observed outcome does not vary, so the statistic is undefined.
    InsufficientVariation { statistic: &'static str },
    /// Too few rows for the statistic.
    InsufficientData { statistic: &'static str, needed: usize, found: usize },
    /// A fit or observed value is NaN or infinite.
    NonFiniteValue { what: &'static str, index: usize, value: f64 },
    /// KS needs observed values in [0, 1].
    ObservedOutOfRange { index: usize, value: f64 },
    /// A row of a one-hot matrix is not a single 1 among 0s.
    InvalidOneHot { row: usize, reason: String },

    // ---- Configuration ----
    /// Two vectors that must align have different lengths.
    LengthMismatch { what: &'static str, expected: usize, found: usize },
    /// Target column index outside the matrix.
    InvalidTargetColumn { index: usize, columns: usize },
    EmptyTargetSet,
    DuplicateTargetColumn { index: usize },
    /// Quantiles must satisfy 0 ≤ low < high ≤ 1.
    InvalidQuantiles { low: f64, high: f64 },
    /// Segments must group by a field other than the slicing feature.
    SegmentFieldIsFeature { field: String },
    /// Wrapped tabular lookup failure.
    Data(DataError),
}

impl AssessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssessError::InsufficientVariation { .. }
            | AssessError::InsufficientData { .. }
            | AssessError::NonFiniteValue { .. }
            | AssessError::ObservedOutOfRange { .. }
            | AssessError::InvalidOneHot { .. } => ErrorKind::InputQuality,
            AssessError::Data(err) => err.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for AssessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssessError::Data(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssessError::InsufficientVariation { statistic } => {
                write!(f, "Insufficient variation in observed outcome for {statistic}")
            }
            AssessError::InsufficientData { statistic, needed, found } => {
                write!(f, "{statistic} needs at least {needed} rows, found {found}")
            }
            AssessError::NonFiniteValue { what, index, value } => {
                write!(f, "Non-finite {what} value {value} at index {index}")
            }
            AssessError::ObservedOutOfRange { index, value } => {
                write!(f, "Observed value {value} at index {index} outside [0, 1]")
            }
            AssessError::InvalidOneHot { row, reason } => {
                write!(f, "Row {row} is not one-hot: {reason}")
            }
            AssessError::LengthMismatch { what, expected, found } => {
                write!(f, "Length mismatch for {what}: expected {expected}, found {found}")
            }
            AssessError::InvalidTargetColumn { index, columns } => {
                write!(f, "Target column {index} out of range for {columns} columns")
            }
            AssessError::EmptyTargetSet => write!(f, "Target column set is empty"),
            AssessError::DuplicateTargetColumn { index } => {
                write!(f, "Target column {index} listed twice")
            }
            AssessError::InvalidQuantiles { low, high } => {
                write!(f, "Invalid quantiles ({low}, {high}): need 0 <= low < high <= 1")
            }
            AssessError::SegmentFieldIsFeature { field } => {
                write!(f, "Segment field '{field}' is the slicing feature")
            }
            AssessError::Data(err) => write!(f, "Data error: {err}"),
        }
    }
}

impl From<DataError> for AssessError {
    fn from(err: DataError) -> Self {
        AssessError::Data(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<AssessError> for PyErr {
    fn from(err: AssessError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Which variants are skippable input-quality errors.
    // - Display text and error sources for wrapped data errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Variation and size problems are input quality; shape problems are
    // configuration.
    //
    // Given
    // -----
    // - One variant of each family and a wrapped data error.
    //
    // Expect
    // ------
    // - Matching `ErrorKind`s.
    fn kinds_split_input_quality_from_configuration() {
        assert_eq!(
            AssessError::InsufficientVariation { statistic: "KS" }.kind(),
            ErrorKind::InputQuality
        );
        assert_eq!(
            AssessError::InsufficientData { statistic: "deciles", needed: 10, found: 3 }.kind(),
            ErrorKind::InputQuality
        );
        assert_eq!(AssessError::EmptyTargetSet.kind(), ErrorKind::Configuration);
        let wrapped = AssessError::from(DataError::UnknownColumn { name: "age".into() });
        assert_eq!(wrapped.kind(), ErrorKind::Configuration);
    }

    #[test]
    // Purpose
    // -------
    // Messages carry the payload and wrapped errors expose their source.
    //
    // Given
    // -----
    // - `InvalidTargetColumn { 5, 3 }` and a wrapped `UnknownField`.
    //
    // Expect
    // ------
    // - Text mentions both numbers; the wrapper has a source.
    fn display_and_source() {
        use std::error::Error;

        let msg = AssessError::InvalidTargetColumn { index: 5, columns: 3 }.to_string();
        assert!(msg.contains('5') && msg.contains('3'));
        let wrapped = AssessError::from(DataError::UnknownField { name: "x".into() });
        assert!(wrapped.source().is_some());
        assert!(wrapped.to_string().contains("Unknown field 'x'"));
    }
}
