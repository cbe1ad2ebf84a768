//! ui::log
//!
//! Structured logging capability.
//!
//! # Design
//!
//! The logger is constructed once per run and passed explicitly to every
//! component that needs it. Nothing in this crate logs through ambient or
//! global state. Each entry is one JSON line on stderr: level, message,
//! UTC timestamp, and any structured fields the caller attaches.
//!
//! For tests, [`Logger::captured`] returns a logger whose entries are
//! collected in memory instead of written to stderr, so assertions can be
//! made about what was logged (e.g. that restore failures during unwind
//! are logged rather than swallowed).

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{json, Value};

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Verbose diagnostics.
    Debug,
    /// Normal progress reporting.
    Info,
    /// Suspicious but non-fatal conditions.
    Warn,
    /// Failures.
    Error,
}

impl Level {
    /// Stable string form used in emitted entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Output verbosity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    Normal,
    /// Everything.
    Debug,
}

impl Verbosity {
    /// Create verbosity from CLI flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    fn admits(&self, level: Level) -> bool {
        match self {
            Verbosity::Quiet => level >= Level::Error,
            Verbosity::Normal => level >= Level::Info,
            Verbosity::Debug => true,
        }
    }
}

/// Where emitted entries go.
#[derive(Clone)]
enum Sink {
    Stderr,
    Memory(Arc<Mutex<Vec<Value>>>),
}

/// The logging capability.
///
/// Cheap to clone; clones of a captured logger share the same buffer.
#[derive(Clone)]
pub struct Logger {
    verbosity: Verbosity,
    sink: Sink,
}

impl Logger {
    /// Create a logger writing JSON lines to stderr.
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            sink: Sink::Stderr,
        }
    }

    /// Create a logger that records entries in memory.
    ///
    /// Returns the logger and a handle to the shared entry buffer.
    pub fn captured(verbosity: Verbosity) -> (Self, Arc<Mutex<Vec<Value>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            verbosity,
            sink: Sink::Memory(Arc::clone(&buffer)),
        };
        (logger, buffer)
    }

    /// Emit one entry with structured fields.
    pub fn emit(&self, level: Level, message: &str, fields: &[(&str, Value)]) {
        if !self.verbosity.admits(level) {
            return;
        }

        let mut entry = json!({
            "level": level.as_str(),
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(map) = entry.as_object_mut() {
            for (key, value) in fields {
                map.insert((*key).to_string(), value.clone());
            }
        }

        match &self.sink {
            Sink::Stderr => {
                let mut err = std::io::stderr().lock();
                let _ = writeln!(err, "{}", entry);
            }
            Sink::Memory(buffer) => {
                if let Ok(mut entries) = buffer.lock() {
                    entries.push(entry);
                }
            }
        }
    }

    /// Emit at debug level.
    pub fn debug(&self, message: &str, fields: &[(&str, Value)]) {
        self.emit(Level::Debug, message, fields);
    }

    /// Emit at info level.
    pub fn info(&self, message: &str, fields: &[(&str, Value)]) {
        self.emit(Level::Info, message, fields);
    }

    /// Emit at warn level.
    pub fn warn(&self, message: &str, fields: &[(&str, Value)]) {
        self.emit(Level::Warn, message, fields);
    }

    /// Emit at error level.
    pub fn error(&self, message: &str, fields: &[(&str, Value)]) {
        self.emit(Level::Error, message, fields);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod verbosity {
        use super::*;

        #[test]
        fn from_flags() {
            assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
            assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
            // quiet wins over debug
            assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        }

        #[test]
        fn quiet_admits_errors_only() {
            assert!(Verbosity::Quiet.admits(Level::Error));
            assert!(!Verbosity::Quiet.admits(Level::Warn));
            assert!(!Verbosity::Quiet.admits(Level::Info));
        }
    }

    mod logger {
        use super::*;

        #[test]
        fn captured_entries_carry_fields() {
            let (log, entries) = Logger::captured(Verbosity::Debug);
            log.info("loaded", &[("components", json!(3))]);

            let entries = entries.lock().unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0]["level"], "INFO");
            assert_eq!(entries[0]["message"], "loaded");
            assert_eq!(entries[0]["components"], 3);
            assert!(entries[0]["timestamp"].is_string());
        }

        #[test]
        fn filtered_levels_are_dropped() {
            let (log, entries) = Logger::captured(Verbosity::Normal);
            log.debug("noise", &[]);
            log.error("boom", &[]);

            let entries = entries.lock().unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0]["level"], "ERROR");
        }

        #[test]
        fn clones_share_the_buffer() {
            let (log, entries) = Logger::captured(Verbosity::Normal);
            let clone = log.clone();
            clone.info("from clone", &[]);

            assert_eq!(entries.lock().unwrap().len(), 1);
        }
    }
}
