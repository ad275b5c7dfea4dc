//! data — tabular inputs: columns, levels, and field metadata.
//!
//! Purpose
//! -------
//! Describe the evaluation data the slicer and assessment statistics read:
//! a row count, named feature columns with missing cells, and per-field
//! definitions (categorical level order or continuous normalization).
//!
//! Conventions
//! -----------
//! - Level order inside a [`LevelIndex`] is the column order of the
//!   corresponding model output.
//! - Missing values are `None` cells and are never assigned to a slice.

pub mod errors;
pub mod field;
pub mod frame;
pub mod level;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DataError, DataResult};
pub use self::field::{FieldDef, FieldRole, Normalization};
pub use self::frame::{Column, Frame, Tabular};
pub use self::level::{Level, LevelIndex};

pub mod prelude {
    pub use super::errors::{DataError, DataResult};
    pub use super::field::{FieldDef, FieldRole, Normalization};
    pub use super::frame::{Column, Frame, Tabular};
    pub use super::level::{Level, LevelIndex};
}
