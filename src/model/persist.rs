//! model::persist — copy-on-write persistence of a model directory.
//!
//! A patched classifier is never written over its source. [`persist_copy`]
//! copies every auxiliary artifact of the source directory (field
//! definitions, vocabularies, anything else) into a fresh destination and
//! only then writes the classifier file, so the copied original model file is
//! replaced by the patched one and the source directory is left untouched.
use std::{
    fs,
    path::{Path, PathBuf},
};

use slog::{Logger, debug, info};

use crate::model::{
    classifier::Classifier,
    errors::{ModelError, ModelResult},
};

/// Copy `source` into `dest` recursively, then save `model` into `dest`.
///
/// Returns the destination directory.
///
/// # Errors
/// - `ModelError::InvalidDestination` if `dest` equals `source` or lies
///   inside it.
/// - `ModelError::Io` / `ModelError::Serialization` from copying or saving.
pub fn persist_copy<M: Classifier + ?Sized>(
    model: &M, source: &Path, dest: &Path, log: &Logger,
) -> ModelResult<PathBuf> {
    check_destination(source, dest)?;
    fs::create_dir_all(dest).map_err(|e| ModelError::io(dest, e))?;
    let copied = copy_tree(source, dest, log)?;
    let model_path = model.save(dest)?;
    info!(log, "persisted adjusted model";
        "dest" => %dest.display(),
        "artifacts_copied" => copied,
        "model_file" => %model_path.display());
    Ok(dest.to_path_buf())
}

/// Recursively copy the contents of `from` into `to`; returns the number of
/// files copied.
fn copy_tree(from: &Path, to: &Path, log: &Logger) -> ModelResult<usize> {
    let mut copied = 0;
    let entries = fs::read_dir(from).map_err(|e| ModelError::io(from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ModelError::io(from, e))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| ModelError::io(&src, e))?;
        if file_type.is_dir() {
            fs::create_dir_all(&dst).map_err(|e| ModelError::io(&dst, e))?;
            copied += copy_tree(&src, &dst, log)?;
        } else {
            fs::copy(&src, &dst).map_err(|e| ModelError::io(&src, e))?;
            debug!(log, "copied artifact"; "file" => %src.display());
            copied += 1;
        }
    }
    Ok(copied)
}

/// Fail unless `dest` lies outside `source`. `dest` need not exist yet.
///
/// # Errors
/// - `ModelError::InvalidDestination` if `dest` equals `source` or lies
///   inside it.
/// - `ModelError::Io` if `source` cannot be resolved.
pub fn check_destination(source: &Path, dest: &Path) -> ModelResult<()> {
    let source_abs = fs::canonicalize(source).map_err(|e| ModelError::io(source, e))?;
    // dest may not exist yet; resolve its nearest existing ancestor.
    let mut cursor = dest.to_path_buf();
    let mut tail = Vec::new();
    let dest_abs = loop {
        match fs::canonicalize(&cursor) {
            Ok(abs) => break tail.iter().rev().fold(abs, |acc: PathBuf, part| acc.join(part)),
            Err(_) => match (cursor.file_name().map(|n| n.to_os_string()), cursor.parent()) {
                (Some(name), Some(parent)) => {
                    tail.push(name);
                    cursor = if parent.as_os_str().is_empty() {
                        PathBuf::from(".")
                    } else {
                        parent.to_path_buf()
                    };
                }
                _ => break dest.to_path_buf(),
            },
        }
    };
    if dest_abs.starts_with(&source_abs) {
        return Err(ModelError::InvalidDestination {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{
            field::FieldDef,
            level::{Level, LevelIndex},
        },
        logging::discard_logger,
        model::{
            classifier::{DenseClassifier, MODEL_FILE},
            layers::{Activation, LayerRole, LayerSpec, LayerStack},
        },
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recursive artifact copy with the model file replaced.
    // - Source directory left byte-identical.
    // - Refusal to write into the source tree.
    // -------------------------------------------------------------------------

    fn model() -> DenseClassifier {
        let target = FieldDef::categorical(
            "y",
            LevelIndex::new(vec![Level::Int(0), Level::Int(1)]).unwrap(),
        );
        let layers = LayerStack::new(vec![LayerSpec::fully_connected(
            "out",
            LayerRole::Output,
            Activation::Softmax,
            1,
            2,
        )])
        .unwrap();
        DenseClassifier::new("m", target, layers).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Auxiliary artifacts are copied and the model file is the patched one.
    //
    // Given
    // -----
    // - A source dir with the original model, `fieldDefs.jsn`, and `aux/vocab.txt`.
    // - A patched model with bias (1, 0).
    //
    // Expect
    // ------
    // - Destination holds all three files; its model has the patched bias;
    //   the source model is unchanged.
    fn persist_copy_copies_artifacts_and_writes_patched_model() {
        // Arrange
        let root = tempfile::tempdir().expect("tempdir");
        let source = root.path().join("model");
        let dest = root.path().join("bias");
        fs::create_dir_all(source.join("aux")).unwrap();
        let original = model();
        original.save(&source).unwrap();
        fs::write(source.join("fieldDefs.jsn"), "{}").unwrap();
        fs::write(source.join("aux").join("vocab.txt"), "a\nb\n").unwrap();
        let mut patched = original.clone();
        patched.layers_mut().output_mut().bias = array![1.0, 0.0];

        // Act
        let out = persist_copy(&patched, &source, &dest, &discard_logger()).expect("persist");

        // Assert
        assert_eq!(out, dest);
        assert_eq!(fs::read_to_string(dest.join("fieldDefs.jsn")).unwrap(), "{}");
        assert_eq!(fs::read_to_string(dest.join("aux").join("vocab.txt")).unwrap(), "a\nb\n");
        assert_eq!(DenseClassifier::load(&dest).unwrap(), patched);
        assert_eq!(DenseClassifier::load(&source).unwrap(), original);
        assert!(source.join(MODEL_FILE).exists());
    }

    #[test]
    // Purpose
    // -------
    // Writing into the source directory or below it is refused.
    //
    // Given
    // -----
    // - dest == source, and dest == source/nested (not yet existing).
    //
    // Expect
    // ------
    // - `InvalidDestination` both times; nothing created.
    fn persist_copy_refuses_source_and_nested_destinations() {
        let root = tempfile::tempdir().expect("tempdir");
        let source = root.path().join("model");
        fs::create_dir_all(&source).unwrap();
        let m = model();

        let same = persist_copy(&m, &source, &source, &discard_logger());
        let nested = persist_copy(&m, &source, &source.join("nested"), &discard_logger());

        assert!(matches!(same, Err(ModelError::InvalidDestination { .. })));
        assert!(matches!(nested, Err(ModelError::InvalidDestination { .. })));
        assert!(!source.join("nested").exists());
    }

    #[test]
    // Purpose
    // -------
    // The destination check compares path components, not string prefixes,
    // and resolves destinations that do not exist yet.
    //
    // Given
    // -----
    // - A sibling `model-bias`, a missing `model/a/b`, and a missing source.
    //
    // Expect
    // ------
    // - Sibling accepted; deep nesting refused; missing source is `Io`.
    fn check_destination_resolves_missing_paths() {
        let root = tempfile::tempdir().expect("tempdir");
        let source = root.path().join("model");
        fs::create_dir_all(&source).unwrap();

        let sibling = check_destination(&source, &root.path().join("model-bias"));
        let deep = check_destination(&source, &source.join("a").join("b"));
        let missing = check_destination(&root.path().join("gone"), &root.path().join("x"));

        assert_eq!(sibling, Ok(()));
        assert!(matches!(deep, Err(ModelError::InvalidDestination { .. })));
        assert!(matches!(missing, Err(ModelError::Io { .. })));
    }
}
