//! Run context - build once in main, pass to every command
//!
//! ```text
//! main.rs:
//!   TrackerContext::build() -> &TrackerContext
//!   |
//!   v
//! commands/check.rs, release.rs, status.rs:
//!   fn run_*(ctx: &TrackerContext, ...)
//! ```

use crate::core::config::TrackerConfig;
use crate::core::error::TrackerResult;
use std::path::{Path, PathBuf};

/// Working directory plus loaded configuration
#[derive(Debug, Clone)]
pub struct TrackerContext {
  /// Directory relative paths are resolved against
  pub root: PathBuf,

  /// Loaded (or default) configuration
  pub config: TrackerConfig,
}

impl TrackerContext {
  /// Load configuration for `root`, honouring an explicit `--config` path
  pub fn build(root: &Path, config_path: Option<&Path>) -> TrackerResult<Self> {
    let config_path = config_path.map(|p| resolve(root, p));
    let config = TrackerConfig::load(root, config_path.as_deref())?;
    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  /// Snapshot file: CLI override, else config value
  pub fn state_path(&self, cli_override: Option<&Path>) -> PathBuf {
    resolve(&self.root, cli_override.unwrap_or(&self.config.state_file))
  }

  /// Notes file: CLI override, else config value
  pub fn notes_path(&self, cli_override: Option<&Path>) -> PathBuf {
    resolve(&self.root, cli_override.unwrap_or(&self.config.notes_file))
  }

  /// Tracked repository names in display order
  pub fn display_order(&self) -> Vec<&str> {
    self.config.display_order()
  }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    root.join(path)
  }
}
