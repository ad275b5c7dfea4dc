//! logging — slog loggers handed to the bias and assessment entry points.
//!
//! Every operation that reports progress takes a `&slog::Logger` instead of
//! consulting a process-wide verbosity switch. Callers choose the sink:
//! [`terminal_logger`] for interactive use, [`discard_logger`] for tests and
//! silent batch runs, or any logger of their own.
use slog::{Drain, Level, Logger, o};

/// Asynchronous, human-readable logger writing to stderr.
///
/// Records below `level` are dropped before formatting.
pub fn terminal_logger(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    Logger::root(drain, o!("crate" => env!("CARGO_PKG_NAME")))
}

/// Logger that swallows every record.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}
