//! data::level — values a categorical feature or target can take.
//!
//! [`Level`] is totally ordered so slices and level curves come out in a
//! stable order: integers first, then reals (compared with `total_cmp`),
//! then text. [`LevelIndex`] maps each level of a categorical field to its
//! column position in model output.
use std::{cmp::Ordering, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::data::errors::{DataError, DataResult};

/// One value of a categorical feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Int(i64),
    Real(f64),
    Text(String),
}

impl Level {
    fn rank(&self) -> u8 {
        match self {
            Level::Int(_) => 0,
            Level::Real(_) => 1,
            Level::Text(_) => 2,
        }
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Level::Int(a), Level::Int(b)) => a.cmp(b),
            (Level::Real(a), Level::Real(b)) => a.total_cmp(b),
            (Level::Text(a), Level::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Level {}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Int(v) => write!(f, "{v}"),
            Level::Real(v) => write!(f, "{v}"),
            Level::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Level {
    fn from(v: i64) -> Self {
        Level::Int(v)
    }
}

impl From<f64> for Level {
    fn from(v: f64) -> Self {
        Level::Real(v)
    }
}

impl From<&str> for Level {
    fn from(v: &str) -> Self {
        Level::Text(v.to_string())
    }
}

impl From<String> for Level {
    fn from(v: String) -> Self {
        Level::Text(v)
    }
}

/// Ordered set of levels with O(log m) level → position lookup.
///
/// Position `i` is the column of that level in one-hot observations and in
/// the classifier's probability output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Level>", into = "Vec<Level>")]
pub struct LevelIndex {
    levels: Vec<Level>,
    positions: BTreeMap<Level, usize>,
}

impl LevelIndex {
    /// Build an index; positions follow the order of `levels`.
    ///
    /// # Errors
    /// - `DataError::DuplicateLevel` if a level repeats.
    pub fn new(levels: Vec<Level>) -> DataResult<Self> {
        let mut positions = BTreeMap::new();
        for (i, level) in levels.iter().enumerate() {
            if positions.insert(level.clone(), i).is_some() {
                return Err(DataError::DuplicateLevel { level: level.to_string() });
            }
        }
        Ok(Self { levels, positions })
    }

    pub fn index_of(&self, level: &Level) -> Option<usize> {
        self.positions.get(level).copied()
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

impl TryFrom<Vec<Level>> for LevelIndex {
    type Error = DataError;

    fn try_from(levels: Vec<Level>) -> DataResult<Self> {
        LevelIndex::new(levels)
    }
}

impl From<LevelIndex> for Vec<Level> {
    fn from(index: LevelIndex) -> Self {
        index.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Total ordering across and within level variants.
    // - Level index construction, lookup, and JSON round trip through
    //   the plain level list.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Levels sort integers, then reals, then text; NaN reals are orderable.
    //
    // Given
    // -----
    // - A shuffled mix of variants including `Real(NaN)`.
    //
    // Expect
    // ------
    // - Sorted order Int(-1), Int(3), Real(0.5), Real(NaN), Text("a").
    fn levels_sort_by_variant_then_value() {
        let mut levels = vec![
            Level::from("a"),
            Level::Real(f64::NAN),
            Level::Int(3),
            Level::Real(0.5),
            Level::Int(-1),
        ];

        levels.sort();

        assert_eq!(levels[0], Level::Int(-1));
        assert_eq!(levels[1], Level::Int(3));
        assert_eq!(levels[2], Level::Real(0.5));
        assert!(matches!(levels[3], Level::Real(v) if v.is_nan()));
        assert_eq!(levels[4], Level::from("a"));
    }

    #[test]
    // Purpose
    // -------
    // Positions follow construction order and duplicates are rejected.
    //
    // Given
    // -----
    // - Levels ["low", "mid", "high"], then ["x", "x"].
    //
    // Expect
    // ------
    // - "high" at 2, unknown levels absent, duplicate error.
    fn level_index_lookup_and_duplicates() {
        let index = LevelIndex::new(vec!["low".into(), "mid".into(), "high".into()])
            .expect("distinct levels");

        assert_eq!(index.len(), 3);
        assert_eq!(index.index_of(&Level::from("high")), Some(2));
        assert_eq!(index.index_of(&Level::from("none")), None);
        assert_eq!(index.level(0), Some(&Level::from("low")));

        let dup = LevelIndex::new(vec!["x".into(), "x".into()]);
        assert_eq!(dup, Err(DataError::DuplicateLevel { level: "x".to_string() }));
    }

    #[test]
    // Purpose
    // -------
    // A level index serializes as its plain level list.
    //
    // Given
    // -----
    // - Levels [1, "b"].
    //
    // Expect
    // ------
    // - JSON `[1,"b"]`, parsed back to an equal index.
    fn level_index_serializes_as_level_list() {
        let index = LevelIndex::new(vec![Level::Int(1), Level::from("b")]).expect("levels");

        let json = serde_json::to_string(&index).expect("serialize");
        let back: LevelIndex = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(json, r#"[1,"b"]"#);
        assert_eq!(back, index);
    }
}
