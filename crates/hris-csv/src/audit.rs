//! The anomaly audit artifact as a CSV file.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use hris_core::{audit::AuditLog, derived::AnomalyRecord};

use crate::error::{Error, Result};

/// Writes anomalies to a single CSV file at `path`.
///
/// The file is written next to its final location and renamed into place,
/// so readers see either the previous artifact or the new one. An empty
/// anomaly set removes the file.
#[derive(Debug, Clone)]
pub struct CsvAuditLog {
  path: PathBuf,
}

impl CsvAuditLog {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  fn staging_path(&self) -> PathBuf {
    let mut name = self.path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    self.path.with_file_name(name)
  }

  /// Write `anomalies` to `staging`, then rename it over the artifact.
  fn write_staged(&self, staging: &Path, anomalies: &[AnomalyRecord]) -> Result<()> {
    let write_err = |source: csv::Error| Error::Write { path: staging.to_path_buf(), source };

    let mut writer = csv::Writer::from_path(staging).map_err(write_err)?;
    for anomaly in anomalies {
      writer.serialize(anomaly).map_err(write_err)?;
    }
    writer
      .flush()
      .map_err(|source| Error::Io { path: staging.to_path_buf(), source })?;
    drop(writer);

    fs::rename(staging, &self.path)
      .map_err(|source| Error::Io { path: self.path.clone(), source })
  }

  fn remove(&self) -> Result<()> {
    match fs::remove_file(&self.path) {
      Ok(()) => {
        tracing::debug!(path = %self.path.display(), "removed stale audit artifact");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(Error::Io { path: self.path.clone(), source }),
    }
  }
}

impl AuditLog for CsvAuditLog {
  type Error = Error;

  fn write(&self, anomalies: &[AnomalyRecord]) -> Result<()> {
    if anomalies.is_empty() {
      return self.remove();
    }

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)
        .map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
    }

    let staging = self.staging_path();
    if let Err(e) = self.write_staged(&staging, anomalies) {
      if let Err(cleanup) = fs::remove_file(&staging)
        && cleanup.kind() != io::ErrorKind::NotFound
      {
        tracing::warn!(path = %staging.display(), error = %cleanup, "staging file left behind");
      }
      return Err(e);
    }

    tracing::debug!(
      path = %self.path.display(),
      rows = anomalies.len(),
      "wrote audit artifact"
    );
    Ok(())
  }
}

/// Read an audit artifact back.
///
/// `Ok(None)` means no artifact exists, which a completed run uses to signal
/// that there were no anomalies.
pub fn read_audit(path: &Path) -> Result<Option<Vec<AnomalyRecord>>> {
  if !path.exists() {
    return Ok(None);
  }
  let csv_err = |source: csv::Error| Error::Csv { path: path.to_path_buf(), source };

  let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
  let rows = reader
    .deserialize()
    .collect::<Result<Vec<AnomalyRecord>, csv::Error>>()
    .map_err(csv_err)?;
  Ok(Some(rows))
}
