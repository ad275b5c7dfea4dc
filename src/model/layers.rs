//! model::layers — typed layer descriptors with a tagged output role.
//!
//! Purpose
//! -------
//! Represent a classifier's layer stack as an ordered list of descriptors
//! where exactly one layer carries [`LayerRole::Output`]. [`LayerStack`]
//! validates that invariant once at construction and remembers the output
//! position, so finding the output layer and checking its activation is O(1).
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly one layer is tagged `Output`, and it is fully connected.
//! - Every layer's bias has `units` entries; fully-connected weights, when
//!   present, are `inputs × units`.
//!
//! Conventions
//! -----------
//! - Serialized as a plain JSON array of layers; the output position is
//!   recomputed on load.
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::model::errors::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
            Activation::Softmax => "softmax",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    FullyConnected,
    Dropout,
    Embedding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    Hidden,
    Output,
}

/// One layer of the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    pub role: LayerRole,
    pub activation: Activation,
    pub units: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Array2<f64>>,
    pub bias: Array1<f64>,
}

impl LayerSpec {
    /// A fully-connected layer with zero weights and bias.
    pub fn fully_connected(
        name: impl Into<String>, role: LayerRole, activation: Activation, inputs: usize,
        units: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::FullyConnected,
            role,
            activation,
            units,
            weights: Some(Array2::zeros((inputs, units))),
            bias: Array1::zeros(units),
        }
    }

    pub fn with_bias(mut self, bias: Array1<f64>) -> Self {
        self.bias = bias;
        self
    }

    fn check_shape(&self) -> ModelResult<()> {
        if self.bias.len() != self.units {
            return Err(ModelError::LayerShape {
                layer: self.name.clone(),
                reason: format!("bias has {} entries for {} units", self.bias.len(), self.units),
            });
        }
        if let Some(w) = &self.weights {
            if w.ncols() != self.units {
                return Err(ModelError::LayerShape {
                    layer: self.name.clone(),
                    reason: format!("weights have {} columns for {} units", w.ncols(), self.units),
                });
            }
        }
        Ok(())
    }
}

/// Ordered layers with a cached output position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayerSpec>", into = "Vec<LayerSpec>")]
pub struct LayerStack {
    layers: Vec<LayerSpec>,
    output: usize,
}

impl LayerStack {
    /// # Errors
    /// - `ModelError::NoOutputLayer` / `MultipleOutputLayers` unless exactly
    ///   one layer has the output role.
    /// - `ModelError::OutputNotFullyConnected` if that layer is not dense.
    /// - `ModelError::LayerShape` for inconsistent bias or weight shapes.
    pub fn new(layers: Vec<LayerSpec>) -> ModelResult<Self> {
        let mut output: Option<usize> = None;
        for (i, layer) in layers.iter().enumerate() {
            layer.check_shape()?;
            if layer.role != LayerRole::Output {
                continue;
            }
            if let Some(prev) = output {
                return Err(ModelError::MultipleOutputLayers {
                    first: layers[prev].name.clone(),
                    second: layer.name.clone(),
                });
            }
            output = Some(i);
        }
        let output = output.ok_or(ModelError::NoOutputLayer)?;
        if layers[output].kind != LayerKind::FullyConnected {
            return Err(ModelError::OutputNotFullyConnected { layer: layers[output].name.clone() });
        }
        Ok(Self { layers, output })
    }

    pub fn output(&self) -> &LayerSpec {
        &self.layers[self.output]
    }

    /// Mutable access to the output layer. Only the bias and weights should
    /// be changed through it; role and kind are fixed at construction.
    pub fn output_mut(&mut self) -> &mut LayerSpec {
        &mut self.layers[self.output]
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl TryFrom<Vec<LayerSpec>> for LayerStack {
    type Error = ModelError;

    fn try_from(layers: Vec<LayerSpec>) -> ModelResult<Self> {
        LayerStack::new(layers)
    }
}

impl From<LayerStack> for Vec<LayerSpec> {
    fn from(stack: LayerStack) -> Self {
        stack.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Output-role validation (missing, duplicated, non-dense).
    // - Shape checks on bias and weights.
    // - JSON round trip restoring the cached output position.
    // -------------------------------------------------------------------------

    fn hidden(name: &str) -> LayerSpec {
        LayerSpec::fully_connected(name, LayerRole::Hidden, Activation::Relu, 4, 8)
    }

    fn output(name: &str, activation: Activation) -> LayerSpec {
        LayerSpec::fully_connected(name, LayerRole::Output, activation, 8, 3)
    }

    #[test]
    // Purpose
    // -------
    // The unique output layer is found regardless of position.
    //
    // Given
    // -----
    // - hidden, output(softmax), dropout.
    //
    // Expect
    // ------
    // - `output().name == "out"` with softmax activation.
    fn stack_locates_unique_output_layer() {
        let dropout = LayerSpec {
            name: "drop".into(),
            kind: LayerKind::Dropout,
            role: LayerRole::Hidden,
            activation: Activation::Linear,
            units: 3,
            weights: None,
            bias: Array1::zeros(3),
        };

        let stack = LayerStack::new(vec![hidden("h1"), output("out", Activation::Softmax), dropout])
            .expect("valid stack");

        assert_eq!(stack.output().name, "out");
        assert_eq!(stack.output().activation, Activation::Softmax);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Missing or duplicated output roles are rejected.
    //
    // Given
    // -----
    // - Only hidden layers; then two output layers.
    //
    // Expect
    // ------
    // - `NoOutputLayer`, then `MultipleOutputLayers { first: "a", second: "b" }`.
    fn stack_rejects_missing_and_duplicate_outputs() {
        assert_eq!(LayerStack::new(vec![hidden("h1")]), Err(ModelError::NoOutputLayer));

        let dup = LayerStack::new(vec![
            output("a", Activation::Softmax),
            output("b", Activation::Softmax),
        ]);
        assert_eq!(
            dup,
            Err(ModelError::MultipleOutputLayers { first: "a".into(), second: "b".into() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Bias length must equal the unit count.
    //
    // Given
    // -----
    // - An output layer with 3 units and a 2-entry bias.
    //
    // Expect
    // ------
    // - `LayerShape`.
    fn stack_rejects_bias_shape_mismatch() {
        let bad = output("out", Activation::Softmax).with_bias(array![0.0, 0.0]);

        assert!(matches!(LayerStack::new(vec![bad]), Err(ModelError::LayerShape { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Serialization keeps the layer list and rebuilds the output index.
    //
    // Given
    // -----
    // - hidden + output(sigmoid) with a non-zero bias.
    //
    // Expect
    // ------
    // - Equal stack after a JSON round trip.
    fn stack_round_trips_through_json() {
        let stack = LayerStack::new(vec![
            hidden("h1"),
            output("out", Activation::Sigmoid).with_bias(array![0.1, -0.2, 0.3]),
        ])
        .expect("valid stack");

        let json = serde_json::to_string(&stack).expect("serialize");
        let back: LayerStack = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back, stack);
        assert_eq!(back.output().bias, array![0.1, -0.2, 0.3]);
    }
}
