//! model::errors — failures in layer descriptors and model persistence.
use std::path::PathBuf;

use crate::errors::ErrorKind;

pub type ModelResult<T> = Result<T, ModelError>;

/// ModelError — structural and storage failures of a classifier artifact.
///
/// Variants
/// --------
/// - `NoOutputLayer` / `MultipleOutputLayers`: the layer list must tag
///   exactly one layer with the output role.
/// - `OutputNotFullyConnected`: the output role is only valid on a
///   fully-connected layer.
/// - `LayerShape`: a layer's bias or weights disagree with its unit count.
/// - `TargetWidthMismatch`: output units differ from the target's class count.
/// - `InvalidDestination`: the destination equals or lies inside the source
///   directory.
/// - `Io` / `Serialization`: filesystem and JSON failures, with the path.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NoOutputLayer,
    MultipleOutputLayers { first: String, second: String },
    OutputNotFullyConnected { layer: String },
    LayerShape { layer: String, reason: String },
    TargetWidthMismatch { units: usize, classes: usize },
    InvalidDestination { source: PathBuf, dest: PathBuf },
    Io { path: PathBuf, message: String },
    Serialization { path: PathBuf, message: String },
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Io { .. } | ModelError::Serialization { .. } => ErrorKind::Persistence,
            _ => ErrorKind::Configuration,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ModelError::Io { path: path.into(), message: err.to_string() }
    }

    pub(crate) fn serialization(path: impl Into<PathBuf>, err: serde_json::Error) -> Self {
        ModelError::Serialization { path: path.into(), message: err.to_string() }
    }
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NoOutputLayer => write!(f, "No layer is tagged as the output layer"),
            ModelError::MultipleOutputLayers { first, second } => {
                write!(f, "Layers '{first}' and '{second}' are both tagged as output")
            }
            ModelError::OutputNotFullyConnected { layer } => {
                write!(f, "Output layer '{layer}' is not fully connected")
            }
            ModelError::LayerShape { layer, reason } => {
                write!(f, "Layer '{layer}' has inconsistent shape: {reason}")
            }
            ModelError::TargetWidthMismatch { units, classes } => {
                write!(f, "Output layer has {units} units but the target has {classes} classes")
            }
            ModelError::InvalidDestination { source, dest } => write!(
                f,
                "Destination {} must differ from and lie outside source {}",
                dest.display(),
                source.display()
            ),
            ModelError::Io { path, message } => {
                write!(f, "I/O error at {}: {message}", path.display())
            }
            ModelError::Serialization { path, message } => {
                write!(f, "Serialization error at {}: {message}", path.display())
            }
        }
    }
}
