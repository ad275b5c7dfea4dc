//! errors — failure categories shared by every module's error enum.
//!
//! Each subtree (`optimization`, `model`, `data`, `bias`, `assessment`) owns
//! its own error enum. All of them expose `kind()` returning one of the
//! categories below so orchestration code can decide whether a failure is
//! the caller's data, the caller's configuration, the solver, or storage.

/// Category of a failure, independent of the module that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Inputs are present but numerically unusable (degenerate probabilities,
    /// constant scores, too few rows).
    InputQuality,
    /// Inputs contradict each other or the model (wrong class count, unknown
    /// target level, unsupported activation).
    Configuration,
    /// The solver did not reach an acceptable minimum.
    Convergence,
    /// Reading or writing model artifacts failed.
    Persistence,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::InputQuality => "input quality",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Convergence => "convergence",
            ErrorKind::Persistence => "persistence",
        };
        f.write_str(label)
    }
}
