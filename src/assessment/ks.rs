//! assessment::ks — Kolmogorov–Smirnov separation of a score between
//! positive and negative outcomes.
//!
//! Purpose
//! -------
//! Measure how well a fitted score ranks observed positives above observed
//! negatives: walk the rows from the highest score down, accumulate the
//! share of positive and negative mass seen so far, and report the largest
//! gap between the two cumulative curves as a percentage.
//!
//! Key behaviors
//! -------------
//! - Rows are ordered by `fit` descending; rows with equal `fit` are stepped
//!   through together, so the statistic does not depend on tie order and a
//!   constant score yields 0%.
//! - Each row contributes `obs` to the positive mass and `1 − obs` to the
//!   negative mass. For 0/1 outcomes this is the usual count-based KS; for
//!   fractional `obs` it is the mass-weighted generalization.
//! - Both cumulative curves are returned (starting at 0, one point per
//!   distinct score) for plotting.
//!
//! Invariants & assumptions
//! ------------------------
//! - `obs ∈ [0, 1]` and both total masses are positive; otherwise the
//!   statistic is undefined and an input-quality error is returned.
//! - The statistic lies in [0, 100].
//!
//! Testing notes
//! -------------
//! - Unit tests check perfect separation (100%), identical scores (0%),
//!   tie handling, and the degenerate-outcome error.
use ndarray::ArrayView1;

use crate::assessment::{
    coalesce::FitObs,
    errors::{AssessError, AssessResult},
    validation::validate_unit_interval,
};

/// KsOutcome — result of a KS computation.
///
/// Fields
/// ------
/// - `statistic`: `f64`
///   `max |CDF_pos − CDF_neg|` expressed as a percentage in [0, 100].
/// - `score_at_max`: `f64`
///   The score at which the maximum gap is first reached.
/// - `scores`: `Vec<f64>`
///   Distinct scores in descending order; `scores[k]` is the score after
///   which point `k + 1` of each curve is taken.
/// - `positive_cdf` / `negative_cdf`: `Vec<f64>`
///   Cumulative share of positive / negative mass, each of length
///   `scores.len() + 1` and starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct KsOutcome {
    pub statistic: f64,
    pub score_at_max: f64,
    pub scores: Vec<f64>,
    pub positive_cdf: Vec<f64>,
    pub negative_cdf: Vec<f64>,
}

/// Compute the KS statistic for a validated `(fit, obs)` pair.
///
/// Errors
/// ------
/// - `AssessError::ObservedOutOfRange` if an `obs` entry is outside [0, 1].
/// - `AssessError::InsufficientVariation` if all mass is positive or all
///   mass is negative (this includes an empty pair).
pub fn ks_statistic(pair: &FitObs) -> AssessResult<KsOutcome> {
    ks_from_views(pair.fit(), pair.obs())
}

pub(crate) fn ks_from_views(
    fit: ArrayView1<'_, f64>, obs: ArrayView1<'_, f64>,
) -> AssessResult<KsOutcome> {
    validate_unit_interval(obs)?;
    let total_pos: f64 = obs.sum();
    let total_neg: f64 = obs.len() as f64 - total_pos;
    if total_pos <= 0.0 || total_neg <= 0.0 {
        return Err(AssessError::InsufficientVariation { statistic: "KS" });
    }

    let order = descending_order(fit);
    let mut scores = Vec::new();
    let mut positive_cdf = vec![0.0];
    let mut negative_cdf = vec![0.0];
    let (mut pos, mut neg) = (0.0_f64, 0.0_f64);
    let (mut best, mut score_at_max) = (0.0_f64, fit[order[0]]);

    let mut k = 0;
    while k < order.len() {
        let score = fit[order[k]];
        // Consume the whole tie group before taking a point. `total_cmp`
        // keeps the group non-empty even for NaN scores.
        while k < order.len() && fit[order[k]].total_cmp(&score).is_eq() {
            let o = obs[order[k]];
            pos += o;
            neg += 1.0 - o;
            k += 1;
        }
        let (cp, cn) = (pos / total_pos, neg / total_neg);
        scores.push(score);
        positive_cdf.push(cp);
        negative_cdf.push(cn);
        if (cp - cn).abs() > best {
            best = (cp - cn).abs();
            score_at_max = score;
        }
    }

    Ok(KsOutcome { statistic: 100.0 * best, score_at_max, scores, positive_cdf, negative_cdf })
}

/// Row indices sorted by score, highest first. Stable for equal scores.
pub(crate) fn descending_order(fit: ArrayView1<'_, f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fit.len()).collect();
    order.sort_by(|&a, &b| fit[b].total_cmp(&fit[a]));
    order
}
