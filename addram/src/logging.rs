//! Console backend for the `log` crate.

use std::io::Write;

/// The logger instance handed to the `log` crate.
pub static LOGGER: ConsoleLogger = ConsoleLogger;

/// Writes `[LEVEL] message` lines to standard output.
pub struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[{:5}] {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Install the console logger.
///
/// Verbose runs also show per-step detail. Calling this again only
/// changes the level.
pub fn init(verbose: bool) {
    if log::set_logger(&LOGGER).is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level(verbose));
}

/// Maximum level shown for a run.
pub fn level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}
