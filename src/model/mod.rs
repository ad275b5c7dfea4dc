//! model — the fitted-classifier seam: layers, artifact, persistence.
//!
//! Purpose
//! -------
//! Give bias correction typed access to a classifier's output layer and a
//! copy-on-write way to store the patched result. Training and the forward
//! pass live elsewhere; probabilities reach this crate already computed.
//!
//! Key behaviors
//! -------------
//! - [`layers::LayerStack`] validates the single tagged output layer once
//!   and serves it in O(1).
//! - [`classifier::Classifier`] is the trait bias correction depends on;
//!   [`classifier::DenseClassifier`] implements it with JSON storage.
//! - [`persist::persist_copy`] copies a model directory and writes the
//!   patched classifier into the copy.

pub mod classifier;
pub mod errors;
pub mod layers;
pub mod persist;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::classifier::{Classifier, DenseClassifier, MODEL_FILE};
pub use self::errors::{ModelError, ModelResult};
pub use self::layers::{Activation, LayerKind, LayerRole, LayerSpec, LayerStack};
pub use self::persist::{check_destination, persist_copy};

pub mod prelude {
    pub use super::classifier::{Classifier, DenseClassifier};
    pub use super::errors::{ModelError, ModelResult};
    pub use super::layers::{Activation, LayerRole, LayerSpec, LayerStack};
    pub use super::persist::persist_copy;
}
