//! model::classifier — the classifier seam used by bias correction.
//!
//! [`Classifier`] is what the bias patcher needs from a fitted model: its
//! layer stack, the ordering of its target classes, and a way to write
//! itself into a directory. [`DenseClassifier`] is the in-crate artifact
//! that stores all of that as one JSON document.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    data::field::FieldDef,
    model::{
        errors::{ModelError, ModelResult},
        layers::LayerStack,
    },
};

/// File name of the serialized classifier inside a model directory.
pub const MODEL_FILE: &str = "model.json";

/// What bias correction needs from a fitted classifier.
pub trait Classifier {
    fn layers(&self) -> &LayerStack;
    fn layers_mut(&mut self) -> &mut LayerStack;

    /// The target field; for a categorical target its levels give the class
    /// ordering of the probability columns.
    fn target(&self) -> &FieldDef;

    /// Number of output columns (`m`).
    fn class_count(&self) -> usize {
        self.target().width()
    }

    /// Write the classifier's own artifact into `dir`, which already exists.
    fn save(&self, dir: &Path) -> ModelResult<PathBuf>;
}

/// A dense feed-forward classifier described by its layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseClassifier {
    name: String,
    target: FieldDef,
    layers: LayerStack,
}

impl DenseClassifier {
    /// # Errors
    /// - `ModelError::TargetWidthMismatch` if the output layer's unit count
    ///   differs from the target's width.
    pub fn new(name: impl Into<String>, target: FieldDef, layers: LayerStack) -> ModelResult<Self> {
        let units = layers.output().units;
        let classes = target.width();
        if units != classes {
            return Err(ModelError::TargetWidthMismatch { units, classes });
        }
        Ok(Self { name: name.into(), target, layers })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read `dir/model.json`.
    ///
    /// # Errors
    /// - `ModelError::Io` / `ModelError::Serialization` with the file path.
    /// - Structural errors re-validated on load (`TargetWidthMismatch`,
    ///   layer-stack errors surface as `Serialization`).
    pub fn load(dir: &Path) -> ModelResult<Self> {
        let path = dir.join(MODEL_FILE);
        let text = fs::read_to_string(&path).map_err(|e| ModelError::io(&path, e))?;
        let model: DenseClassifier =
            serde_json::from_str(&text).map_err(|e| ModelError::serialization(&path, e))?;
        Self::new(model.name, model.target, model.layers)
    }
}

impl Classifier for DenseClassifier {
    fn layers(&self) -> &LayerStack {
        &self.layers
    }

    fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    fn target(&self) -> &FieldDef {
        &self.target
    }

    fn save(&self, dir: &Path) -> ModelResult<PathBuf> {
        let path = dir.join(MODEL_FILE);
        let text =
            serde_json::to_string_pretty(self).map_err(|e| ModelError::serialization(&path, e))?;
        fs::write(&path, text).map_err(|e| ModelError::io(&path, e))?;
        Ok(path)
    }
}
