//! bias::patcher — apply solved shifts to the classifier's output bias.
//!
//! The output layer of a softmax classifier has one bias per class. Adding
//! `b*_j` to the bias of every non-reference class `j` shifts that class's
//! log-odds against the reference by exactly `b*_j`, which is what the
//! objective optimized. The reference class bias is left alone.
use std::path::{Path, PathBuf};

use ndarray::{ArrayView1, s};
use slog::{Logger, debug};

use crate::{
    bias::errors::{BiasError, BiasResult},
    model::{Activation, Classifier, persist_copy},
};

/// Fail unless the classifier's output layer uses softmax.
///
/// # Errors
/// - `BiasError::UnsupportedOutputActivation` naming the layer and its
///   activation.
pub fn check_softmax_output<M: Classifier + ?Sized>(model: &M) -> BiasResult<()> {
    let output = model.layers().output();
    if output.activation != Activation::Softmax {
        return Err(BiasError::UnsupportedOutputActivation {
            layer: output.name.clone(),
            activation: output.activation,
        });
    }
    Ok(())
}

/// `bias[j] += adjustment[j]` for `j < m − 1`.
///
/// # Errors
/// - `BiasError::UnsupportedOutputActivation` if the output is not softmax.
/// - `BiasError::BiasLengthMismatch` unless the output bias has exactly one
///   more entry than `adjustment`.
pub fn patch_output_bias<M: Classifier + ?Sized>(
    model: &mut M, adjustment: ArrayView1<'_, f64>, log: &Logger,
) -> BiasResult<()> {
    check_softmax_output(&*model)?;
    let output = model.layers_mut().output_mut();
    let free = output.bias.len().saturating_sub(1);
    if output.bias.is_empty() || adjustment.len() != free {
        return Err(BiasError::BiasLengthMismatch { expected: free, found: adjustment.len() });
    }
    let mut head = output.bias.slice_mut(s![..free]);
    head += &adjustment;
    debug!(log, "patched output bias"; "layer" => &output.name, "classes" => free + 1);
    Ok(())
}

/// Store a patched classifier next to, never over, its source directory.
///
/// # Errors
/// - `BiasError::Model` wrapping any persistence failure.
pub fn persist_patched<M: Classifier + ?Sized>(
    model: &M, source_dir: &Path, dest_dir: &Path, log: &Logger,
) -> BiasResult<PathBuf> {
    Ok(persist_copy(model, source_dir, dest_dir, log)?)
}
