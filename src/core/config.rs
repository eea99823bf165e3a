use crate::core::error::{ConfigError, ResultExt, TrackerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the persisted snapshot
pub const DEFAULT_STATE_FILE: &str = ".github/upstream-version.json";

/// Default location of the generated changelog table
pub const DEFAULT_NOTES_FILE: &str = "release_notes.md";

/// Built-in tracked set, in display order
const DEFAULT_REPOSITORIES: &[(&str, &str)] = &[
  ("opus-tools", "https://gitlab.xiph.org/xiph/opus-tools.git"),
  ("opus", "https://gitlab.xiph.org/xiph/opus.git"),
  ("opusfile", "https://gitlab.xiph.org/xiph/opusfile.git"),
  ("libopusenc", "https://gitlab.xiph.org/xiph/libopusenc.git"),
  ("ogg", "https://gitlab.xiph.org/xiph/ogg.git"),
  ("flac", "https://gitlab.xiph.org/xiph/flac.git"),
];

/// An upstream repository under watch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRepository {
  pub name: String,
  pub url: String,
}

impl TrackedRepository {
  pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      url: url.into(),
    }
  }
}

/// Which repositories feed the tag and archive names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseNaming {
  /// Drives the tag hash and the first half of the zip name
  #[serde(default = "default_primary")]
  pub primary: String,

  /// Second half of the zip name
  #[serde(default = "default_secondary")]
  pub secondary: String,
}

fn default_primary() -> String {
  "opus-tools".to_string()
}

fn default_secondary() -> String {
  "opus".to_string()
}

impl Default for ReleaseNaming {
  fn default() -> Self {
    Self {
      primary: default_primary(),
      secondary: default_secondary(),
    }
  }
}

/// Configuration for upstream-tracker
/// Searched in order: upstream.toml, .upstream.toml, .github/upstream.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
  #[serde(default = "default_state_file")]
  pub state_file: PathBuf,

  #[serde(default = "default_notes_file")]
  pub notes_file: PathBuf,

  #[serde(default)]
  pub release: ReleaseNaming,

  /// Ordered; the order is the changelog display order
  #[serde(default = "default_repositories")]
  pub repositories: Vec<TrackedRepository>,
}

fn default_state_file() -> PathBuf {
  PathBuf::from(DEFAULT_STATE_FILE)
}

fn default_notes_file() -> PathBuf {
  PathBuf::from(DEFAULT_NOTES_FILE)
}

fn default_repositories() -> Vec<TrackedRepository> {
  DEFAULT_REPOSITORIES
    .iter()
    .map(|(name, url)| TrackedRepository::new(*name, *url))
    .collect()
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self {
      state_file: default_state_file(),
      notes_file: default_notes_file(),
      release: ReleaseNaming::default(),
      repositories: default_repositories(),
    }
  }
}

impl TrackerConfig {
  /// Find config file in search order: upstream.toml, .upstream.toml, .github/upstream.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("upstream.toml"),
      path.join(".upstream.toml"),
      path.join(".github").join("upstream.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load configuration for a working directory.
  ///
  /// An explicit path must exist. Without one, the search order is tried and
  /// the built-in defaults are used when nothing is found.
  pub fn load(root: &Path, explicit: Option<&Path>) -> TrackerResult<Self> {
    let config_path = match explicit {
      Some(path) => {
        if !path.exists() {
          return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
          }
          .into());
        }
        Some(path.to_path_buf())
      }
      None => Self::find_config_path(root),
    };

    let Some(config_path) = config_path else {
      tracing::debug!("no upstream.toml found, using built-in repository list");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), repositories = config.repositories.len(), "loaded config");

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> TrackerResult<Self> {
    let config: TrackerConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate repository list and release naming
  pub fn validate(&self) -> TrackerResult<()> {
    if self.repositories.is_empty() {
      return Err(
        ConfigError::MissingField {
          field: "repositories".to_string(),
        }
        .into(),
      );
    }

    let mut seen = HashSet::new();
    for repo in &self.repositories {
      if repo.name.trim().is_empty() {
        return Err(
          ConfigError::MissingField {
            field: "repositories.name".to_string(),
          }
          .into(),
        );
      }
      if repo.url.trim().is_empty() {
        return Err(
          ConfigError::MissingField {
            field: format!("url for repository '{}'", repo.name),
          }
          .into(),
        );
      }
      if !seen.insert(repo.name.as_str()) {
        return Err(ConfigError::DuplicateRepository { name: repo.name.clone() }.into());
      }
    }

    for (role, name) in [("primary", &self.release.primary), ("secondary", &self.release.secondary)] {
      if !seen.contains(name.as_str()) {
        return Err(
          ConfigError::UnknownRepository {
            name: name.clone(),
            role,
          }
          .into(),
        );
      }
    }

    Ok(())
  }

  /// Names of the tracked repositories in display order
  pub fn display_order(&self) -> Vec<&str> {
    self.repositories.iter().map(|r| r.name.as_str()).collect()
  }
}
