//! assessment::segments — mean fit and mean outcome per level of a grouping
//! field, on a range shared by all segments of one slice.
use std::collections::BTreeMap;

use crate::{
    assessment::{
        coalesce::FitObs,
        errors::{AssessError, AssessResult},
        summary::common_range,
    },
    data::level::Level,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMean {
    pub level: Level,
    pub count: usize,
    pub mean_fit: f64,
    pub mean_obs: f64,
}

/// Segment means of one grouping field within one slice.
///
/// `range` is the common `(low, high)` axis range for every segment chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentTable {
    pub field: String,
    pub range: (f64, f64),
    pub segments: Vec<SegmentMean>,
}

/// Group `pair` by `groups` (aligned row by row) and average each group.
///
/// Rows whose group is `None` are left out. Segments come back in level
/// order.
///
/// # Errors
/// - `AssessError::LengthMismatch` if `groups` is not aligned with `pair`.
/// - Anything [`common_range`] rejects.
pub fn segment_means(
    field: &str, pair: &FitObs, groups: &[Option<Level>], quantiles: (f64, f64),
) -> AssessResult<SegmentTable> {
    if groups.len() != pair.len() {
        return Err(AssessError::LengthMismatch {
            what: "segment groups",
            expected: pair.len(),
            found: groups.len(),
        });
    }
    let range = common_range(pair, quantiles)?;

    let (fit, obs) = (pair.fit(), pair.obs());
    let mut sums: BTreeMap<&Level, (usize, f64, f64)> = BTreeMap::new();
    for (i, level) in groups.iter().enumerate() {
        if let Some(level) = level {
            let entry = sums.entry(level).or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += fit[i];
            entry.2 += obs[i];
        }
    }
    let segments = sums
        .into_iter()
        .map(|(level, (count, fit, obs))| SegmentMean {
            level: level.clone(),
            count,
            mean_fit: fit / count as f64,
            mean_obs: obs / count as f64,
        })
        .collect();
    Ok(SegmentTable { field: field.to_string(), range, segments })
}
