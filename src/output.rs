//! CI output channel (`$GITHUB_OUTPUT`)
//!
//! Values are appended as `key=value` lines. Within one process a key is
//! written at most once: repeating the same value is a no-op, a different
//! value is refused.

use crate::core::error::{OutputError, ResultExt, TrackerError, TrackerResult};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable naming the output file
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Append-only key/value sink for automation
#[derive(Debug, Default)]
pub struct AutomationOutput {
  path: Option<PathBuf>,
  emitted: BTreeMap<String, String>,
}

impl AutomationOutput {
  /// Write to the file named by `$GITHUB_OUTPUT`, or nowhere if unset
  pub fn from_env() -> Self {
    match std::env::var_os(OUTPUT_ENV) {
      Some(path) if !path.is_empty() => Self::to_file(PathBuf::from(path)),
      _ => Self::default(),
    }
  }

  pub fn to_file(path: impl Into<PathBuf>) -> Self {
    Self {
      path: Some(path.into()),
      emitted: BTreeMap::new(),
    }
  }

  /// Output file, if one is configured
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Keys emitted so far in this process
  pub fn emitted(&self) -> &BTreeMap<String, String> {
    &self.emitted
  }

  /// Append `key=value`
  pub fn emit(&mut self, key: &str, value: &str) -> TrackerResult<()> {
    if value.contains('\n') || key.contains('=') {
      return Err(TrackerError::message(format!("Output '{}' must be a single key=value line", key)));
    }

    if let Some(previous) = self.emitted.get(key) {
      if previous == value {
        return Ok(());
      }
      return Err(
        OutputError::ConflictingKey {
          key: key.to_string(),
          previous: previous.clone(),
          value: value.to_string(),
        }
        .into(),
      );
    }

    match &self.path {
      Some(path) => {
        let mut file = OpenOptions::new()
          .create(true)
          .append(true)
          .open(path)
          .with_context(|| format!("Failed to open {}", path.display()))?;
        writeln!(file, "{}={}", key, value).with_context(|| format!("Failed to write {}", path.display()))?;
      }
      None => tracing::debug!("{} not set, skipping output {}={}", OUTPUT_ENV, key, value),
    }

    self.emitted.insert(key.to_string(), value.to_string());
    Ok(())
  }
}
