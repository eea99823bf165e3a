//! Persisted last-known state of every tracked repository
//!
//! The on-disk form is a JSON object keyed by repository name. Reading is
//! lenient: a missing file or malformed content yields an empty snapshot, since
//! the next check repopulates it. Writing is a full atomic replace.

use crate::core::error::{ResultExt, SnapshotError, TrackerResult};
use crate::utils::short_hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Last-known state of one repository
///
/// `commit_hash` is stored in full. An empty hash means the repository was
/// never successfully probed; use [`RepositoryState::commit_hash`] to read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub url: String,
  #[serde(default, rename = "commit_hash")]
  pub hash: String,
  #[serde(default)]
  pub commit_url: String,
  /// As reported by git (`%ci`), never reformatted
  #[serde(default)]
  pub commit_time: String,
}

impl RepositoryState {
  /// Full commit id, or `None` if never probed
  pub fn commit_hash(&self) -> Option<&str> {
    if self.hash.is_empty() { None } else { Some(self.hash.as_str()) }
  }

  /// Seven-character display form of the commit id
  pub fn short_hash(&self) -> &str {
    short_hash(&self.hash)
  }
}

/// Repository name -> last-known state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
  entries: BTreeMap<String, RepositoryState>,
}

impl Snapshot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&RepositoryState> {
    self.entries.get(name)
  }

  #[cfg(test)]
  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  /// Insert under `name`, replacing any previous entry
  pub fn insert(&mut self, name: impl Into<String>, state: RepositoryState) {
    self.entries.insert(name.into(), state);
  }

  #[cfg(test)]
  pub fn remove(&mut self, name: &str) -> Option<RepositoryState> {
    self.entries.remove(name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Parse snapshot JSON.
  ///
  /// Entries that omit `name` take their key as name.
  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    let mut entries: BTreeMap<String, RepositoryState> = serde_json::from_str(content)?;
    for (key, state) in entries.iter_mut() {
      if state.name.is_empty() {
        state.name = key.clone();
      }
    }
    Ok(Self { entries })
  }

  /// Serialise with two-space indentation, keys sorted
  pub fn to_json(&self) -> TrackerResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Load a snapshot, treating a missing or malformed file as empty.
  ///
  /// Other I/O failures (permissions, a directory in the way) are errors.
  pub fn load(path: &Path) -> TrackerResult<Self> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no snapshot yet, starting empty");
        return Ok(Self::new());
      }
      Err(err) if err.kind() == io::ErrorKind::InvalidData => {
        let parse = SnapshotError::Parse {
          path: path.to_path_buf(),
          reason: err.to_string(),
        };
        tracing::warn!("{}; treating as empty", parse);
        return Ok(Self::new());
      }
      Err(err) => {
        return Err(err).with_context(|| format!("Failed to read snapshot {}", path.display()));
      }
    };

    match Self::from_json(&content) {
      Ok(snapshot) => Ok(snapshot),
      Err(err) => {
        let parse = SnapshotError::Parse {
          path: path.to_path_buf(),
          reason: err.to_string(),
        };
        tracing::warn!("{}; treating as empty", parse);
        Ok(Self::new())
      }
    }
  }

  /// Load a snapshot that must already exist on disk
  pub fn load_existing(path: &Path) -> TrackerResult<Self> {
    if !path.exists() {
      return Err(SnapshotError::NotFound { path: path.to_path_buf() }.into());
    }
    Self::load(path)
  }

  /// Replace the file at `path` with this snapshot.
  ///
  /// The content goes to a temporary sibling first and is renamed into place,
  /// so readers see either the old file or the complete new one.
  pub fn save(&self, path: &Path) -> TrackerResult<()> {
    let json = self.to_json()?;
    let parent = match path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p,
      _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent)
      .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(json.as_bytes())
      .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    tmp.persist(path)
      .with_context(|| format!("Failed to replace snapshot {}", path.display()))?;

    tracing::debug!(path = %path.display(), entries = self.len(), "snapshot written");
    Ok(())
  }
}
