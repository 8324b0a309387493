//! Dunion logging utilities. This defines a simple logger with a style which
//! should be used across the workspace to log and print messages.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

use crate::highlight::{highlight, Colour, Modifier};

/// The logger that is installed by the driver for `log!` statements.
///
/// All messages are written to `stderr` so that they never interleave with
/// the output of a command.
#[derive(Default)]
pub struct CompilerLogger {
    /// The maximum level that the logger will emit, set once when the
    /// logger is installed.
    level: OnceCell<LevelFilter>,
}

impl CompilerLogger {
    /// Create a new compiler logger.
    pub const fn new() -> Self {
        Self { level: OnceCell::new() }
    }

    /// Install the given logger as the global logger. If `debug` is set,
    /// then debug messages are emitted as well.
    pub fn install(logger: &'static CompilerLogger, debug: bool) -> Result<(), log::SetLoggerError> {
        let level = if debug { LevelFilter::Debug } else { LevelFilter::Warn };

        // A second install attempt keeps the first level.
        let _ = logger.level.set(level);
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn level(&self) -> LevelFilter {
        self.level.get().copied().unwrap_or(LevelFilter::Warn)
    }
}

impl Log for CompilerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level_prefix = match record.level() {
                Level::Error => highlight(Colour::Red | Modifier::Bold, "error"),
                Level::Warn => highlight(Colour::Yellow | Modifier::Bold, "warn"),
                Level::Info => highlight(Colour::Blue | Modifier::Bold, "info"),
                Level::Debug => highlight(Colour::Blue | Modifier::Bold, "debug"),
                Level::Trace => highlight(Colour::Magenta | Modifier::Bold, "trace"),
            };

            let stderr = std::io::stderr();
            let mut out = stderr.lock();
            let _ = writeln!(out, "{level_prefix}: {}", record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
