//! assessment::summary — descriptive statistics of fitted and observed
//! values, and the common plotting range derived from them.
use ndarray::ArrayView1;
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

use crate::assessment::{
    coalesce::FitObs,
    errors::{AssessError, AssessResult},
    validation::validate_quantiles,
};

/// Count, mean, extremes, median, and a low/high quantile pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub low: f64,
    pub high: f64,
}

impl Summary {
    /// # Errors
    /// - `AssessError::InvalidQuantiles` for a bad quantile pair.
    /// - `AssessError::InsufficientData` for an empty input.
    pub fn of(values: ArrayView1<'_, f64>, quantiles: (f64, f64)) -> AssessResult<Self> {
        validate_quantiles(quantiles.0, quantiles.1)?;
        if values.is_empty() {
            return Err(AssessError::InsufficientData { statistic: "summary", needed: 1, found: 0 });
        }
        let mut data = Data::new(values.to_vec());
        Ok(Self {
            count: values.len(),
            mean: data.mean().unwrap_or(f64::NAN),
            min: data.min(),
            max: data.max(),
            median: data.median(),
            low: data.quantile(quantiles.0),
            high: data.quantile(quantiles.1),
        })
    }
}

/// `(min(low_fit, low_obs), max(high_fit, high_obs))` over a pair, so that
/// charts of different segments share one axis.
///
/// # Errors
/// - Anything [`Summary::of`] rejects.
pub fn common_range(pair: &FitObs, quantiles: (f64, f64)) -> AssessResult<(f64, f64)> {
    let fit = Summary::of(pair.fit(), quantiles)?;
    let obs = Summary::of(pair.obs(), quantiles)?;
    Ok((fit.low.min(obs.low), fit.high.max(obs.high)))
}
