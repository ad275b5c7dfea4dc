//! data::field — field metadata: role, levels, and normalization.
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::data::{
    errors::{DataError, DataResult},
    level::LevelIndex,
};

/// Affine normalization applied to a continuous field before modelling.
///
/// `normalized = (raw − mean) / std`, so un-normalizing is `x·std + mean`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    mean: f64,
    std: f64,
}

impl Normalization {
    /// # Errors
    /// - `DataError::InvalidNormalization` unless both values are finite and
    ///   `std > 0`.
    pub fn new(mean: f64, std: f64) -> DataResult<Self> {
        if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
            return Err(DataError::InvalidNormalization { mean, std });
        }
        Ok(Self { mean, std })
    }

    /// The identity normalization.
    pub fn identity() -> Self {
        Self { mean: 0.0, std: 1.0 }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn unnormalize(&self, values: &Array1<f64>) -> Array1<f64> {
        values.mapv(|x| x * self.std + self.mean)
    }
}

/// How a field enters the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum FieldRole {
    /// One numeric column, normalized.
    Continuous { normalization: Normalization },
    /// One-hot encoded over the given levels.
    Categorical { levels: LevelIndex },
}

/// Named field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub role: FieldRole,
}

impl FieldDef {
    pub fn continuous(name: impl Into<String>, normalization: Normalization) -> Self {
        Self { name: name.into(), role: FieldRole::Continuous { normalization } }
    }

    pub fn categorical(name: impl Into<String>, levels: LevelIndex) -> Self {
        Self { name: name.into(), role: FieldRole::Categorical { levels } }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.role, FieldRole::Categorical { .. })
    }

    /// Number of model-output columns the field occupies (`m`).
    pub fn width(&self) -> usize {
        match &self.role {
            FieldRole::Continuous { .. } => 1,
            FieldRole::Categorical { levels } => levels.len(),
        }
    }

    /// # Errors
    /// - `DataError::NotCategorical` for continuous fields.
    pub fn levels(&self) -> DataResult<&LevelIndex> {
        match &self.role {
            FieldRole::Categorical { levels } => Ok(levels),
            FieldRole::Continuous { .. } => {
                Err(DataError::NotCategorical { field: self.name.clone() })
            }
        }
    }

    /// Map model-space values back to the field's natural scale.
    ///
    /// Categorical outputs are probabilities and pass through unchanged.
    pub fn unnormalize(&self, values: &Array1<f64>) -> Array1<f64> {
        match &self.role {
            FieldRole::Continuous { normalization } => normalization.unnormalize(values),
            FieldRole::Categorical { .. } => values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::level::Level;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Normalization validation and inversion.
    // - Role-dependent width, level access, and un-normalization.
    // - The JSON layout of field definitions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Un-normalizing applies x·std + mean.
    //
    // Given
    // -----
    // - mean 10, std 2; values (−1, 0, 1.5).
    //
    // Expect
    // ------
    // - (8, 10, 13). A zero std is rejected.
    fn normalization_inverts_affine_map() {
        let norm = Normalization::new(10.0, 2.0).expect("valid");

        assert_eq!(norm.unnormalize(&array![-1.0, 0.0, 1.5]), array![8.0, 10.0, 13.0]);
        assert!(Normalization::new(0.0, 0.0).is_err());
        assert!(Normalization::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Width and level access depend on the role.
    //
    // Given
    // -----
    // - A 3-level categorical field and a continuous field.
    //
    // Expect
    // ------
    // - Widths 3 and 1; `levels` fails for the continuous field; categorical
    //   values pass through `unnormalize` untouched.
    fn field_role_drives_width_and_levels() {
        let levels = LevelIndex::new(vec![Level::Int(0), Level::Int(1), Level::Int(2)]).unwrap();
        let cat = FieldDef::categorical("segment", levels);
        let cts = FieldDef::continuous("income", Normalization::new(5.0, 3.0).unwrap());

        assert_eq!(cat.width(), 3);
        assert_eq!(cts.width(), 1);
        assert!(cat.levels().is_ok());
        assert_eq!(
            cts.levels().unwrap_err(),
            DataError::NotCategorical { field: "income".to_string() }
        );
        assert_eq!(cat.unnormalize(&array![0.2, 0.8]), array![0.2, 0.8]);
        assert_eq!(cts.unnormalize(&array![1.0]), array![8.0]);
    }

    #[test]
    // Purpose
    // -------
    // Field definitions persist as flat, role-tagged JSON objects.
    //
    // Given
    // -----
    // - A categorical field with levels ["a", "b"].
    //
    // Expect
    // ------
    // - Round trip through JSON reproduces the definition.
    fn field_def_round_trips_through_json() {
        let def = FieldDef::categorical(
            "target",
            LevelIndex::new(vec![Level::from("a"), Level::from("b")]).unwrap(),
        );

        let json = serde_json::to_value(&def).expect("serialize");
        let back: FieldDef = serde_json::from_value(json.clone()).expect("deserialize");

        assert_eq!(json["role"], "categorical");
        assert_eq!(back, def);
    }
}
