//! The append-only pipeline log, `<log_dir>/pipeline_log.txt`.

use std::{
  fs::{self, OpenOptions},
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use chrono::Local;

pub const JOURNAL_FILE: &str = "pipeline_log.txt";

/// One journal per pipeline invocation. Every line carries the invocation's
/// start time, so all lines from a run share a timestamp.
#[derive(Debug, Clone)]
pub struct Journal {
  path:      PathBuf,
  timestamp: String,
}

impl Journal {
  pub fn new(log_dir: &Path) -> Self {
    Self {
      path:      log_dir.join(JOURNAL_FILE),
      timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Append `"{message} @ {timestamp}"`.
  pub fn append(&self, message: &str) -> io::Result<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{message} @ {}", self.timestamp)
  }

  /// Append, logging instead of failing. The journal never stops a run.
  pub fn record(&self, message: &str) {
    if let Err(e) = self.append(message) {
      tracing::warn!(path = %self.path.display(), error = %e, "could not write pipeline log");
    }
  }
}
