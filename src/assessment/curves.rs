//! assessment::curves — per-level mean fit and mean outcome of a feature,
//! in natural units, for fit-vs-actual plots.
use crate::{
    assessment::{
        coalesce::FitObs,
        errors::{AssessError, AssessResult},
        slicer::FeatureSlicer,
    },
    data::level::Level,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CurvePoint {
    pub level: Level,
    pub count: usize,
    pub mean_fit: f64,
    pub mean_obs: f64,
}

/// Points in slice order.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCurve {
    pub feature: String,
    pub points: Vec<CurvePoint>,
}

/// One point per slice of `slicer`, averaging the full-dataset `pair` over
/// the slice's rows.
///
/// # Errors
/// - `AssessError::LengthMismatch` if `pair` is not aligned with the
///   dataset behind `slicer`.
pub fn level_curve(slicer: &FeatureSlicer<'_>, pair: &FitObs) -> AssessResult<LevelCurve> {
    let mut points = Vec::with_capacity(slicer.len());
    for slice in slicer {
        let part = pair.restrict(&slice.mask)?;
        if part.is_empty() {
            return Err(AssessError::InsufficientData {
                statistic: "level curve",
                needed: 1,
                found: 0,
            });
        }
        let n = part.len() as f64;
        points.push(CurvePoint {
            level: slice.level,
            count: part.len(),
            mean_fit: part.fit().sum() / n,
            mean_obs: part.obs().sum() / n,
        });
    }
    Ok(LevelCurve { feature: slicer.feature().to_string(), points })
}
