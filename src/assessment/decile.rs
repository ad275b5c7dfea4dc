//! assessment::decile — ten score-ranked buckets of mean fit vs mean
//! outcome.
//!
//! Rows are ordered by `fit` descending and cut into [`DECILE_BUCKETS`]
//! equal-count buckets of `n / 10` rows; the last bucket also takes the
//! `n mod 10` remainder. Bucket 1 holds the highest scores.
use ndarray::ArrayView1;

use crate::assessment::{
    coalesce::FitObs,
    errors::{AssessError, AssessResult},
    ks::descending_order,
};

pub const DECILE_BUCKETS: usize = 10;

/// One bucket of a [`DecileTable`]; `bucket` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct DecileRow {
    pub bucket: usize,
    pub count: usize,
    pub mean_fit: f64,
    pub mean_obs: f64,
    pub min_fit: f64,
    pub max_fit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecileTable {
    pub rows: Vec<DecileRow>,
}

impl DecileTable {
    /// Mean outcome of the top bucket divided by the overall mean outcome.
    /// `None` when the overall mean is zero.
    pub fn top_lift(&self) -> Option<f64> {
        let total: usize = self.rows.iter().map(|r| r.count).sum();
        let overall: f64 =
            self.rows.iter().map(|r| r.mean_obs * r.count as f64).sum::<f64>() / total as f64;
        let top = self.rows.first()?;
        (overall != 0.0).then(|| top.mean_obs / overall)
    }
}

/// # Errors
/// - `AssessError::InsufficientData` when there are fewer than ten rows.
pub fn decile_table(pair: &FitObs) -> AssessResult<DecileTable> {
    deciles_from_views(pair.fit(), pair.obs())
}

pub(crate) fn deciles_from_views(
    fit: ArrayView1<'_, f64>, obs: ArrayView1<'_, f64>,
) -> AssessResult<DecileTable> {
    let n = fit.len();
    if n < DECILE_BUCKETS {
        return Err(AssessError::InsufficientData {
            statistic: "decile table",
            needed: DECILE_BUCKETS,
            found: n,
        });
    }
    let order = descending_order(fit);
    let size = n / DECILE_BUCKETS;
    let rows = (0..DECILE_BUCKETS)
        .map(|b| {
            let start = b * size;
            let end = if b + 1 == DECILE_BUCKETS { n } else { start + size };
            let members = &order[start..end];
            let count = members.len();
            let sum_fit: f64 = members.iter().map(|&i| fit[i]).sum();
            let sum_obs: f64 = members.iter().map(|&i| obs[i]).sum();
            DecileRow {
                bucket: b + 1,
                count,
                mean_fit: sum_fit / count as f64,
                mean_obs: sum_obs / count as f64,
                // Descending order: first member has the largest score.
                min_fit: fit[members[count - 1]],
                max_fit: fit[members[0]],
            }
        })
        .collect();
    Ok(DecileTable { rows })
}
