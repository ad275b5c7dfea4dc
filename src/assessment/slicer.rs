//! assessment::slicer — partition rows by the observed levels of a feature.
//!
//! Purpose
//! -------
//! Produce, for one feature, a [`Slice`] per distinct observed level: the
//! level, a row mask ([`Slicer`]), and a display label `"feature = level"`.
//!
//! Key behaviors
//! -------------
//! - Levels are counted once in [`FeatureSlicer::new`]; masks are built
//!   lazily, one per `next()`.
//! - Iteration is restartable and stable: each call to
//!   [`FeatureSlicer::iter`] walks the levels in their `Ord` order.
//! - Levels seen on fewer than `min_count` rows are left out.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every row with a present value belongs to exactly one slice (before
//!   `min_count` filtering); rows with a missing or non-finite value belong
//!   to none.
use std::collections::BTreeMap;

use ndarray::{Array1, ArrayView1};

use crate::{
    assessment::errors::{AssessError, AssessResult},
    data::{
        frame::{Column, Tabular},
        level::Level,
    },
};

/// Boolean row mask over a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slicer {
    mask: Vec<bool>,
    count: usize,
}

impl Slicer {
    pub fn from_mask(mask: Vec<bool>) -> Self {
        let count = mask.iter().filter(|&&m| m).count();
        Self { mask, count }
    }

    /// Mask selecting all `rows`.
    pub fn all(rows: usize) -> Self {
        Self { mask: vec![true; rows], count: rows }
    }

    /// Length of the underlying dataset.
    pub fn rows(&self) -> usize {
        self.mask.len()
    }

    /// Number of selected rows.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn contains(&self, row: usize) -> bool {
        self.mask.get(row).copied().unwrap_or(false)
    }

    /// Selected row indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.mask.iter().enumerate().filter_map(|(i, &m)| m.then_some(i)).collect()
    }

    /// The selected entries of `values`.
    ///
    /// # Errors
    /// - `AssessError::LengthMismatch` unless `values` has one entry per row.
    pub fn select(&self, values: ArrayView1<'_, f64>) -> AssessResult<Array1<f64>> {
        if values.len() != self.rows() {
            return Err(AssessError::LengthMismatch {
                what: "slice mask",
                expected: values.len(),
                found: self.rows(),
            });
        }
        Ok(values.iter().zip(&self.mask).filter_map(|(&v, &m)| m.then_some(v)).collect())
    }
}

/// One slice of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub level: Level,
    pub mask: Slicer,
    pub label: String,
}

/// Lazily enumerates the slices of one feature column.
#[derive(Debug, Clone)]
pub struct FeatureSlicer<'a> {
    feature: String,
    column: &'a Column,
    levels: Vec<(Level, usize)>,
}

impl<'a> FeatureSlicer<'a> {
    /// Count the levels of `feature` in `data`, keeping those seen on at
    /// least `min_count` rows.
    ///
    /// # Errors
    /// - `AssessError::Data(UnknownColumn)` if the column does not exist.
    pub fn new<T: Tabular + ?Sized>(
        data: &'a T, feature: &str, min_count: usize,
    ) -> AssessResult<Self> {
        let column = data.column(feature)?;
        let mut counts: BTreeMap<Level, usize> = BTreeMap::new();
        for row in 0..column.len() {
            if let Some(level) = column.level_at(row) {
                *counts.entry(level).or_default() += 1;
            }
        }
        let levels = counts.into_iter().filter(|&(_, n)| n >= min_count).collect();
        Ok(Self { feature: feature.to_string(), column, levels })
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Number of slices that iteration will yield.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Kept levels with their row counts, in iteration order.
    pub fn level_counts(&self) -> &[(Level, usize)] {
        &self.levels
    }

    /// Start a fresh pass over the slices.
    pub fn iter(&self) -> SliceIter<'_, 'a> {
        SliceIter { slicer: self, next: 0 }
    }

    fn build(&self, level: &Level) -> Slice {
        let mask = (0..self.column.len()).map(|row| self.column.has_level(row, level)).collect();
        Slice {
            level: level.clone(),
            mask: Slicer::from_mask(mask),
            label: format!("{} = {level}", self.feature),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s FeatureSlicer<'a> {
    type Item = Slice;
    type IntoIter = SliceIter<'s, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`FeatureSlicer`].
#[derive(Debug, Clone)]
pub struct SliceIter<'s, 'a> {
    slicer: &'s FeatureSlicer<'a>,
    next: usize,
}

impl Iterator for SliceIter<'_, '_> {
    type Item = Slice;

    fn next(&mut self) -> Option<Slice> {
        let (level, _) = self.slicer.levels.get(self.next)?;
        self.next += 1;
        Some(self.slicer.build(level))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.slicer.levels.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for SliceIter<'_, '_> {}
