//! data::frame — in-memory column store implementing [`Tabular`].
//!
//! The slicer and assessment routines only need row counts, named columns,
//! and field metadata, so they are written against the [`Tabular`] trait;
//! [`Frame`] is the in-crate implementation.
use std::collections::BTreeMap;

use crate::data::{
    errors::{DataError, DataResult},
    field::FieldDef,
    level::Level,
};

/// A column of raw feature values. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Continuous(Vec<Option<f64>>),
    Categorical(Vec<Option<Level>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Continuous(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value at `row` as a level; continuous values become `Level::Real`.
    /// Missing cells, non-finite reals, and out-of-range rows give `None`.
    pub fn level_at(&self, row: usize) -> Option<Level> {
        match self {
            Column::Continuous(values) => {
                values.get(row).copied().flatten().filter(|v| v.is_finite()).map(Level::Real)
            }
            Column::Categorical(values) => values.get(row).cloned().flatten(),
        }
    }

    /// `true` when the cell at `row` is present and equal to `level`.
    pub fn has_level(&self, row: usize, level: &Level) -> bool {
        match self {
            Column::Categorical(values) => values.get(row).and_then(Option::as_ref) == Some(level),
            Column::Continuous(_) => self.level_at(row).as_ref() == Some(level),
        }
    }
}

/// Read access to a table of named columns.
pub trait Tabular {
    fn row_count(&self) -> usize;
    fn column(&self, name: &str) -> DataResult<&Column>;
    fn field(&self, name: &str) -> DataResult<&FieldDef>;
}

/// Named columns of equal length plus their field definitions.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    rows: usize,
    columns: BTreeMap<String, Column>,
    fields: BTreeMap<String, FieldDef>,
}

impl Frame {
    pub fn new(rows: usize) -> Self {
        Self { rows, ..Self::default() }
    }

    /// Add or replace a column.
    ///
    /// # Errors
    /// - `DataError::ColumnLengthMismatch` if the column length differs
    ///   from the frame's row count.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> DataResult<Self> {
        let name = name.into();
        if column.len() != self.rows {
            return Err(DataError::ColumnLengthMismatch {
                name,
                expected: self.rows,
                found: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(self)
    }

    pub fn with_field(mut self, def: FieldDef) -> Self {
        self.fields.insert(def.name.clone(), def);
        self
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl Tabular for Frame {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column(&self, name: &str) -> DataResult<&Column> {
        self.columns.get(name).ok_or_else(|| DataError::UnknownColumn { name: name.to_string() })
    }

    fn field(&self, name: &str) -> DataResult<&FieldDef> {
        self.fields.get(name).ok_or_else(|| DataError::UnknownField { name: name.to_string() })
    }
}
