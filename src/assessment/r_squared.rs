//! assessment::r_squared — coefficient of determination for continuous
//! targets.
//!
//! `R² = 1 − Σ(obs − fit)² / Σ(obs − mean(obs))²`. It can be negative when
//! the fit is worse than predicting the mean.
use crate::assessment::{
    coalesce::FitObs,
    errors::{AssessError, AssessResult},
};

/// # Errors
/// - `AssessError::InsufficientData` for fewer than two rows.
/// - `AssessError::InsufficientVariation` when `obs` is constant.
pub fn r_squared(pair: &FitObs) -> AssessResult<f64> {
    let n = pair.len();
    if n < 2 {
        return Err(AssessError::InsufficientData { statistic: "R²", needed: 2, found: n });
    }
    let (fit, obs) = (pair.fit(), pair.obs());
    let mean = obs.sum() / n as f64;
    let ss_tot = obs.mapv(|o| (o - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(AssessError::InsufficientVariation { statistic: "R²" });
    }
    let ss_res = (&obs - &fit).mapv(|r| r * r).sum();
    Ok(1.0 - ss_res / ss_tot)
}
