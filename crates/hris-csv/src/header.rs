//! Column header normalization.

/// `" Start Date "` → `"start_date"`.
pub fn normalize_header(raw: &str) -> String {
  raw.trim().to_lowercase().replace(' ', "_")
}
