//! Append-only run log.
//!
//! One [`RunLog`] is created per command run and handed by reference to the
//! components that need to report per-file failures. Every line is also
//! emitted through `tracing` so it shows up in console diagnostics.
//!
//! Line format: `HH:MM:SS,mmm <name> <LEVEL> <message>`.

use chrono::Local;
use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, ResultExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

pub struct RunLog {
    name: String,
    out: RefCell<Box<dyn Write>>,
}

impl RunLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path, name: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(format!("opening run log {}", path.display()))?;
        Ok(Self::with_writer(name, file))
    }

    pub fn with_writer(name: &str, out: impl Write + 'static) -> Self {
        Self {
            name: name.to_string(),
            out: RefCell::new(Box::new(out)),
        }
    }

    /// A log that only forwards to `tracing`.
    #[cfg(test)]
    pub fn discard(name: &str) -> Self {
        Self::with_writer(name, std::io::sink())
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.line(Level::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.line(Level::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.line(Level::Error, message.as_ref());
    }

    fn line(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(log = %self.name, "{message}"),
            Level::Warn => tracing::warn!(log = %self.name, "{message}"),
            Level::Error => tracing::error!(log = %self.name, "{message}"),
        }

        let stamp = Local::now().format("%H:%M:%S,%3f");
        let mut out = self.out.borrow_mut();
        let written = writeln!(out, "{stamp} {} {} {message}", self.name, level.as_str())
            .and_then(|_| out.flush());
        if let Err(e) = written {
            // The run continues; the console still has the line
            tracing::warn!(error = %e, "Failed to append to run log");
        }
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog").field("name", &self.name).finish_non_exhaustive()
    }
}
