//! assessment — how well model output matches observed outcomes, overall
//! and per level of a chosen feature.
//!
//! Purpose
//! -------
//! Reduce model output and the observed target to a `(fit, obs)` pair per
//! assessment, then report discrimination (KS), calibration (decile table),
//! explained variance (R²), and grouped means, for the whole dataset and
//! for each slice of a feature.
//!
//! Key behaviors
//! -------------
//! - [`slicer::FeatureSlicer`] lazily partitions rows by a feature's levels.
//! - [`coalesce`] sums target columns so one reduction yields both the
//!   fitted probability and the observed indicator.
//! - [`ks`], [`decile`], [`r_squared`], [`segments`], [`curves`], and
//!   [`summary`] compute the statistics on a pair.
//! - [`api::slice_and_assess`] drives a full run and skips slices whose
//!   data cannot support a statistic.
//!
//! Conventions
//! -----------
//! - Continuous targets are reported in natural units (un-normalized).
//! - KS is reported in percent; R² as a fraction.
//! - Every computation reads shared inputs only, so slices can be assessed
//!   independently.

pub mod api;
pub mod coalesce;
pub mod curves;
pub mod decile;
pub mod errors;
pub mod ks;
pub mod r_squared;
pub mod segments;
pub mod slicer;
pub mod summary;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{
    AssessOptions, Assessment, ModelOutput, OverallStats, SkippedSlice, SliceReport, SliceSpec,
    slice_and_assess,
};
pub use self::coalesce::{FitObs, ScoreSource, TargetSet, coalesce};
pub use self::curves::{CurvePoint, LevelCurve, level_curve};
pub use self::decile::{DECILE_BUCKETS, DecileRow, DecileTable, decile_table};
pub use self::errors::{AssessError, AssessResult};
pub use self::ks::{KsOutcome, ks_statistic};
pub use self::r_squared::r_squared;
pub use self::segments::{SegmentMean, SegmentTable, segment_means};
pub use self::slicer::{FeatureSlicer, Slice, Slicer};
pub use self::summary::{Summary, common_range};

pub mod prelude {
    pub use super::api::{AssessOptions, Assessment, ModelOutput, SliceSpec, slice_and_assess};
    pub use super::coalesce::FitObs;
    pub use super::errors::{AssessError, AssessResult};
    pub use super::slicer::FeatureSlicer;
}
