//! assessment::api — overall and per-slice fit assessment of one feature.
//!
//! Purpose
//! -------
//! [`slice_and_assess`] is the single entry point for assessment:
//! 1. validate the configuration (quantiles, segment fields, alignment);
//! 2. coalesce the model output over the requested target columns into one
//!    full-dataset [`FitObs`] pair, in natural units;
//! 3. compute overall KS (categorical) or R² (continuous) and the decile
//!    table;
//! 4. build the level curve of the slicing feature;
//! 5. per slice, compute KS (categorical), the decile table, and segment
//!    means for each configured segment field.
//!
//! Error policy
//! ------------
//! - Configuration errors abort before any statistic is computed.
//! - Input-quality errors (no outcome variation, too few rows) are logged
//!   at warn level. Overall statistics become `None`; an affected slice is
//!   recorded in [`Assessment::skipped`] and the remaining slices continue.
use ndarray::{ArrayView1, ArrayView2};
use slog::{Logger, debug, info, warn};

use crate::{
    assessment::{
        coalesce::{FitObs, TargetSet},
        curves::{LevelCurve, level_curve},
        decile::{DecileTable, decile_table},
        errors::{AssessError, AssessResult},
        ks::{KsOutcome, ks_statistic},
        r_squared::r_squared,
        segments::{SegmentTable, segment_means},
        slicer::{FeatureSlicer, Slice, Slicer},
        validation::validate_quantiles,
    },
    data::{field::Normalization, frame::Tabular, level::Level},
    errors::ErrorKind,
};

/// What to assess: display name, slicing feature, and the target columns
/// whose summed probability and indicator form the `(fit, obs)` pair.
/// `targets` is ignored for continuous outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSpec {
    pub name: String,
    pub feature: String,
    pub targets: Vec<usize>,
}

/// Run-wide settings.
///
/// - `min_count`: slices with fewer rows are not produced (0 keeps all).
/// - `segment_fields`: grouping fields for per-slice segment means.
/// - `range_quantiles`: `(low, high)` quantiles for the common segment
///   range.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessOptions {
    pub min_count: usize,
    pub segment_fields: Vec<String>,
    pub range_quantiles: (f64, f64),
}

impl AssessOptions {
    /// # Errors
    /// - `AssessError::InvalidQuantiles` unless `0 ≤ low < high ≤ 1`.
    pub fn new(
        min_count: usize, segment_fields: Vec<String>, range_quantiles: (f64, f64),
    ) -> AssessResult<Self> {
        validate_quantiles(range_quantiles.0, range_quantiles.1)?;
        Ok(Self { min_count, segment_fields, range_quantiles })
    }
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self { min_count: 0, segment_fields: Vec::new(), range_quantiles: (0.05, 0.95) }
    }
}

/// Model output and observed target for every dataset row.
#[derive(Debug, Clone, Copy)]
pub enum ModelOutput<'a> {
    /// `n × m` class probabilities and the `n × m` one-hot observed target.
    Categorical { probabilities: ArrayView2<'a, f64>, observed: ArrayView2<'a, f64> },
    /// Model-space prediction and observation of a continuous target.
    Continuous {
        fit: ArrayView1<'a, f64>,
        observed: ArrayView1<'a, f64>,
        normalization: Normalization,
    },
}

impl ModelOutput<'_> {
    pub fn rows(&self) -> usize {
        match self {
            ModelOutput::Categorical { probabilities, .. } => probabilities.nrows(),
            ModelOutput::Continuous { fit, .. } => fit.len(),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, ModelOutput::Categorical { .. })
    }

    /// The `(fit, obs)` pair for `targets`, optionally restricted by `mask`.
    ///
    /// # Errors
    /// - Target-set, mask, one-hot, and pair validation failures.
    pub fn pair(&self, targets: &[usize], mask: Option<&Slicer>) -> AssessResult<FitObs> {
        match self {
            ModelOutput::Categorical { probabilities, observed } => {
                let targets = TargetSet::new(targets, probabilities.ncols())?;
                FitObs::categorical(*probabilities, *observed, &targets, mask)
            }
            ModelOutput::Continuous { fit, observed, normalization } => {
                FitObs::continuous(*fit, *observed, normalization, mask)
            }
        }
    }
}

/// Dataset-wide statistics; `None` where the data could not support one.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStats {
    pub rows: usize,
    pub ks: Option<KsOutcome>,
    pub r_squared: Option<f64>,
    pub deciles: Option<DecileTable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceReport {
    pub level: Level,
    pub label: String,
    pub count: usize,
    pub ks: Option<KsOutcome>,
    pub deciles: DecileTable,
    pub segments: Vec<SegmentTable>,
}

/// A slice left out of the report, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSlice {
    pub label: String,
    pub reason: AssessError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub name: String,
    pub feature: String,
    pub overall: OverallStats,
    pub curve: LevelCurve,
    pub slices: Vec<SliceReport>,
    pub skipped: Vec<SkippedSlice>,
}

/// Assess `output` against its observed target overall and per level of
/// `spec.feature`.
///
/// # Errors
/// - `AssessError::Data` for unknown feature or segment columns.
/// - `AssessError::SegmentFieldIsFeature`, `InvalidQuantiles`,
///   `LengthMismatch`, target-set errors.
/// - `AssessError::InvalidOneHot` / `NonFiniteValue` for unusable
///   full-dataset inputs.
pub fn slice_and_assess<T: Tabular + ?Sized>(
    data: &T, output: &ModelOutput<'_>, spec: &SliceSpec, opts: &AssessOptions, log: &Logger,
) -> AssessResult<Assessment> {
    check_config(data, output, spec, opts)?;
    info!(log, "assessing feature";
        "name" => &spec.name,
        "feature" => &spec.feature,
        "rows" => data.row_count());

    let full = output.pair(&spec.targets, None)?;
    let overall = overall_stats(output, &full, log)?;

    let slicer = FeatureSlicer::new(data, &spec.feature, opts.min_count)?;
    let curve = level_curve(&slicer, &full)?;

    let mut slices = Vec::with_capacity(slicer.len());
    let mut skipped = Vec::new();
    for slice in &slicer {
        match assess_slice(data, output, &full, &slice, opts) {
            Ok(report) => {
                debug!(log, "slice assessed"; "slice" => &report.label, "rows" => report.count);
                slices.push(report);
            }
            Err(err) if err.kind() == ErrorKind::InputQuality => {
                warn!(log, "skipping slice"; "slice" => &slice.label, "reason" => %err);
                skipped.push(SkippedSlice { label: slice.label, reason: err });
            }
            Err(err) => return Err(err),
        }
    }
    info!(log, "feature assessed";
        "feature" => &spec.feature,
        "slices" => slices.len(),
        "skipped" => skipped.len());

    Ok(Assessment {
        name: spec.name.clone(),
        feature: spec.feature.clone(),
        overall,
        curve,
        slices,
        skipped,
    })
}

fn check_config<T: Tabular + ?Sized>(
    data: &T, output: &ModelOutput<'_>, spec: &SliceSpec, opts: &AssessOptions,
) -> AssessResult<()> {
    validate_quantiles(opts.range_quantiles.0, opts.range_quantiles.1)?;
    if output.rows() != data.row_count() {
        return Err(AssessError::LengthMismatch {
            what: "model output rows",
            expected: data.row_count(),
            found: output.rows(),
        });
    }
    data.column(&spec.feature)?;
    for field in &opts.segment_fields {
        if *field == spec.feature {
            return Err(AssessError::SegmentFieldIsFeature { field: field.clone() });
        }
        data.column(field)?;
    }
    if let ModelOutput::Categorical { probabilities, .. } = output {
        TargetSet::new(&spec.targets, probabilities.ncols())?;
    }
    Ok(())
}

fn overall_stats(
    output: &ModelOutput<'_>, full: &FitObs, log: &Logger,
) -> AssessResult<OverallStats> {
    let (ks, r2) = if output.is_categorical() {
        (soften(ks_statistic(full), "KS", log)?, None)
    } else {
        (None, soften(r_squared(full), "R²", log)?)
    };
    let deciles = soften(decile_table(full), "decile table", log)?;
    match (&ks, r2) {
        (Some(ks), _) => info!(log, "overall fit"; "ks_percent" => ks.statistic),
        (_, Some(r2)) => info!(log, "overall fit"; "r2_percent" => 100.0 * r2),
        _ => {}
    }
    Ok(OverallStats { rows: full.len(), ks, r_squared: r2, deciles })
}

fn assess_slice<T: Tabular + ?Sized>(
    data: &T, output: &ModelOutput<'_>, full: &FitObs, slice: &Slice, opts: &AssessOptions,
) -> AssessResult<SliceReport> {
    let part = full.restrict(&slice.mask)?;
    let ks = if output.is_categorical() { Some(ks_statistic(&part)?) } else { None };
    let deciles = decile_table(&part)?;
    let rows = slice.mask.indices();
    let segments = opts
        .segment_fields
        .iter()
        .map(|field| {
            let column = data.column(field)?;
            let groups: Vec<Option<Level>> = rows.iter().map(|&r| column.level_at(r)).collect();
            segment_means(field, &part, &groups, opts.range_quantiles)
        })
        .collect::<AssessResult<Vec<_>>>()?;
    Ok(SliceReport {
        level: slice.level.clone(),
        label: slice.label.clone(),
        count: part.len(),
        ks,
        deciles,
        segments,
    })
}

/// Turn an input-quality failure into `None` with a warning.
fn soften<V>(result: AssessResult<V>, statistic: &str, log: &Logger) -> AssessResult<Option<V>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == ErrorKind::InputQuality => {
            warn!(log, "overall statistic unavailable"; "statistic" => statistic, "reason" => %err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::frame::{Column, Frame},
        logging::discard_logger,
    };
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A categorical run with one skipped (degenerate) slice.
    // - A continuous run reporting R².
    // - Configuration failures raised before any statistic.
    // -------------------------------------------------------------------------

    /// 40 rows; slice "a" (rows 0..20) has mixed outcomes, slice "b" (rows
    /// 20..40) only negatives.
    fn categorical_fixture() -> (Frame, Array2<f64>, Array2<f64>) {
        let n = 40;
        let mut probs = Array2::<f64>::zeros((n, 2));
        let mut one_hot = Array2::<f64>::zeros((n, 2));
        let mut group = Vec::with_capacity(n);
        let mut channel = Vec::with_capacity(n);
        for i in 0..n {
            let p = 0.05 + 0.9 * (i % 20) as f64 / 19.0;
            probs[[i, 0]] = p;
            probs[[i, 1]] = 1.0 - p;
            let positive = i < 20 && i % 20 >= 10;
            one_hot[[i, usize::from(!positive)]] = 1.0;
            group.push(Some(Level::from(if i < 20 { "a" } else { "b" })));
            channel.push(Some(Level::Int((i % 2) as i64)));
        }
        let frame = Frame::new(n)
            .with_column("group", Column::Categorical(group))
            .unwrap()
            .with_column("channel", Column::Categorical(channel))
            .unwrap();
        (frame, probs, one_hot)
    }

    #[test]
    // Purpose
    // -------
    // Degenerate slices are skipped and the rest are reported.
    //
    // Given
    // -----
    // - Two slices; slice "b" has no positive outcome; one segment field.
    //
    // Expect
    // ------
    // - Overall KS present; slice "a" reported with KS 100 and two
    //   segments; slice "b" in `skipped` with `InsufficientVariation`.
    fn degenerate_slice_is_skipped() {
        // Arrange
        let (frame, probs, one_hot) = categorical_fixture();
        let output =
            ModelOutput::Categorical { probabilities: probs.view(), observed: one_hot.view() };
        let spec = SliceSpec { name: "class 0".into(), feature: "group".into(), targets: vec![0] };
        let opts = AssessOptions::new(0, vec!["channel".into()], (0.05, 0.95)).unwrap();

        // Act
        let report = slice_and_assess(&frame, &output, &spec, &opts, &discard_logger()).unwrap();

        // Assert
        assert!(report.overall.ks.is_some());
        assert!(report.overall.deciles.is_some());
        assert_eq!(report.slices.len(), 1);
        let a = &report.slices[0];
        assert_eq!(a.label, "group = a");
        assert!((a.ks.as_ref().unwrap().statistic - 100.0).abs() < 1e-9);
        assert_eq!(a.deciles.rows.len(), 10);
        assert_eq!(a.segments[0].segments.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].label, "group = b");
        assert_eq!(report.skipped[0].reason, AssessError::InsufficientVariation { statistic: "KS" });
        assert_eq!(report.curve.points.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Continuous outputs report R² overall and no KS.
    //
    // Given
    // -----
    // - 20 rows, fit = obs in model space, one slicing level.
    //
    // Expect
    // ------
    // - R² = 1, `ks` absent, one slice.
    fn continuous_output_reports_r_squared() {
        let obs = Array1::from_iter((0..20).map(f64::from));
        let frame = Frame::new(20)
            .with_column("all", Column::Categorical(vec![Some(Level::Int(1)); 20]))
            .unwrap();
        let output = ModelOutput::Continuous {
            fit: obs.view(),
            observed: obs.view(),
            normalization: Normalization::new(5.0, 2.0).unwrap(),
        };
        let spec = SliceSpec { name: "y".into(), feature: "all".into(), targets: vec![] };

        let report =
            slice_and_assess(&frame, &output, &spec, &AssessOptions::default(), &discard_logger())
                .unwrap();

        assert!((report.overall.r_squared.unwrap() - 1.0).abs() < 1e-12);
        assert!(report.overall.ks.is_none());
        assert_eq!(report.slices.len(), 1);
        assert!(report.slices[0].ks.is_none());
    }

    #[test]
    // Purpose
    // -------
    // Configuration problems fail before any statistic.
    //
    // Given
    // -----
    // - Segment field equal to the feature; unknown feature; bad target.
    //
    // Expect
    // ------
    // - `SegmentFieldIsFeature`, `Data(UnknownColumn)`, `InvalidTargetColumn`.
    fn configuration_errors_fail_fast() {
        let (frame, probs, one_hot) = categorical_fixture();
        let output =
            ModelOutput::Categorical { probabilities: probs.view(), observed: one_hot.view() };
        let log = discard_logger();
        let spec = SliceSpec { name: "s".into(), feature: "group".into(), targets: vec![0] };

        let same = AssessOptions { segment_fields: vec!["group".into()], ..Default::default() };
        assert!(matches!(
            slice_and_assess(&frame, &output, &spec, &same, &log),
            Err(AssessError::SegmentFieldIsFeature { .. })
        ));

        let unknown = SliceSpec { feature: "nope".into(), ..spec.clone() };
        assert!(matches!(
            slice_and_assess(&frame, &output, &unknown, &AssessOptions::default(), &log),
            Err(AssessError::Data(_))
        ));

        let bad_target = SliceSpec { targets: vec![2], ..spec };
        assert_eq!(
            slice_and_assess(&frame, &output, &bad_target, &AssessOptions::default(), &log)
                .unwrap_err(),
            AssessError::InvalidTargetColumn { index: 2, columns: 2 }
        );
    }
}
