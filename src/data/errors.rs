//! data::errors — failures raised while describing or reading tabular inputs.
use crate::errors::ErrorKind;

pub type DataResult<T> = Result<T, DataError>;

/// DataError — lookup and shape problems in tabular sources.
///
/// Variants
/// --------
/// - `UnknownColumn` / `UnknownField`: the name is not present in the source.
/// - `ColumnLengthMismatch`: a column does not have one value per row.
/// - `DuplicateLevel`: a level appears twice in a level index.
/// - `InvalidNormalization`: a standard deviation is zero, negative, or the
///   parameters are non-finite.
/// - `NotCategorical`: a categorical field was required.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    UnknownColumn { name: String },
    UnknownField { name: String },
    ColumnLengthMismatch { name: String, expected: usize, found: usize },
    DuplicateLevel { level: String },
    InvalidNormalization { mean: f64, std: f64 },
    NotCategorical { field: String },
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::UnknownColumn { name } => write!(f, "Unknown column '{name}'"),
            DataError::UnknownField { name } => write!(f, "Unknown field '{name}'"),
            DataError::ColumnLengthMismatch { name, expected, found } => {
                write!(f, "Column '{name}' has {found} values, expected {expected}")
            }
            DataError::DuplicateLevel { level } => write!(f, "Duplicate level '{level}'"),
            DataError::InvalidNormalization { mean, std } => {
                write!(f, "Invalid normalization (mean {mean}, std {std}): std must be finite and > 0")
            }
            DataError::NotCategorical { field } => {
                write!(f, "Field '{field}' is not categorical")
            }
        }
    }
}
