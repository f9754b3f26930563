//! Runtime configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable prefix, e.g. `HRIS_STORE_PATH`.
pub const ENV_PREFIX: &str = "HRIS";

/// Pipeline configuration, deserialised from `hris.toml` layered under
/// `HRIS_*` environment variables. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Directory holding `employees.csv`, `applicants.csv` and
  /// `employment_types.csv`.
  pub source_dir:        PathBuf,
  pub store_path:        PathBuf,
  /// Receives the drop logs and `pipeline_log.txt`.
  pub log_dir:           PathBuf,
  pub audit_path:        PathBuf,
  pub host:              String,
  pub port:              u16,
  /// Where failure alerts are POSTed. Alerts are only logged when unset.
  pub alert_webhook_url: Option<String>,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      source_dir:        PathBuf::from("data"),
      store_path:        PathBuf::from("hris_project.db"),
      log_dir:           PathBuf::from("logs"),
      audit_path:        PathBuf::from("logs/invalid_hires.csv"),
      host:              "127.0.0.1".to_string(),
      port:              5000,
      alert_webhook_url: None,
    }
  }
}

impl PipelineConfig {
  /// Load from `path` (optional) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let cfg: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()?;
    Ok(cfg.expanded())
  }

  /// The same configuration with a leading `~` expanded in every path.
  pub fn expanded(self) -> Self {
    Self {
      source_dir: expand_tilde(&self.source_dir),
      store_path: expand_tilde(&self.store_path),
      log_dir: expand_tilde(&self.log_dir),
      audit_path: expand_tilde(&self.audit_path),
      ..self
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
