//! Error types for upstream-tracker with contextual messages and exit codes
//!
//! Per-repository failures during a check (probe, metadata fetch) are recovered
//! by the reconciler and only ever logged. Everything that reaches `main` is
//! fatal and maps to an exit code through [`TrackerError::exit_code`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for upstream-tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing snapshot, missing mandatory entries)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (conflicting automation output)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for upstream-tracker
#[derive(Debug)]
pub enum TrackerError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Snapshot store errors
  Snapshot(SnapshotError),

  /// Automation output channel errors
  Output(OutputError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message { message: String, context: Option<String> },
}

impl TrackerError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    TrackerError::Message {
      message: msg.into(),
      context: None,
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors become a message headed by the context. Structured variants
  /// pass through unchanged.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      TrackerError::Message { message, context } => TrackerError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      TrackerError::Io(err) => TrackerError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
      },
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      TrackerError::Config(_) => ExitCode::User,
      TrackerError::Git(_) => ExitCode::System,
      TrackerError::Snapshot(_) => ExitCode::User,
      TrackerError::Output(_) => ExitCode::Validation,
      TrackerError::Io(_) => ExitCode::System,
      TrackerError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      TrackerError::Config(e) => e.help_message(),
      TrackerError::Git(e) => e.help_message(),
      TrackerError::Snapshot(e) => e.help_message(),
      _ => None,
    }
  }
}

impl fmt::Display for TrackerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrackerError::Config(e) => write!(f, "{}", e),
      TrackerError::Git(e) => write!(f, "{}", e),
      TrackerError::Snapshot(e) => write!(f, "{}", e),
      TrackerError::Output(e) => write!(f, "{}", e),
      TrackerError::Io(e) => write!(f, "I/O error: {}", e),
      TrackerError::Message { message, context } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for TrackerError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      TrackerError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for TrackerError {
  fn from(err: io::Error) -> Self {
    TrackerError::Io(err)
  }
}

impl From<toml_edit::de::Error> for TrackerError {
  fn from(err: toml_edit::de::Error) -> Self {
    TrackerError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for TrackerError {
  fn from(err: serde_json::Error) -> Self {
    TrackerError::message(format!("JSON error: {}", err))
  }
}

impl From<tempfile::PersistError> for TrackerError {
  fn from(err: tempfile::PersistError) -> Self {
    TrackerError::Io(err.error)
  }
}

impl From<GitError> for TrackerError {
  fn from(err: GitError) -> Self {
    TrackerError::Git(err)
  }
}

impl From<SnapshotError> for TrackerError {
  fn from(err: SnapshotError) -> Self {
    TrackerError::Snapshot(err)
  }
}

impl From<OutputError> for TrackerError {
  fn from(err: OutputError) -> Self {
    TrackerError::Output(err)
  }
}

impl From<ConfigError> for TrackerError {
  fn from(err: ConfigError) -> Self {
    TrackerError::Config(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicit --config path does not exist
  NotFound { path: PathBuf },

  /// Missing or empty required field
  MissingField { field: String },

  /// Same repository name listed twice
  DuplicateRepository { name: String },

  /// `[release]` references a repository that is not tracked
  UnknownRepository { name: String, role: &'static str },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Omit --config to use upstream.toml discovery or the built-in repository list.".to_string())
      }
      ConfigError::UnknownRepository { name, .. } => Some(format!(
        "Add a [[repositories]] entry named '{}' or change the [release] section.",
        name
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::DuplicateRepository { name } => {
        write!(f, "Repository '{}' is listed more than once", name)
      }
      ConfigError::UnknownRepository { name, role } => {
        write!(f, "Release {} repository '{}' is not a tracked repository", role, name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Remote head could not be resolved
  Probe { url: String, reason: String },

  /// Commit details could not be read from a shallow checkout
  MetadataFetch { url: String, sha: String, reason: String },

  /// The git binary could not be started at all
  Spawn { command: String, source: io::Error },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::Spawn { .. } => Some("Make sure `git` is installed and on PATH.".to_string()),
      GitError::Probe { reason, .. } if reason.contains("Could not resolve host") => {
        Some("Check network access to the remote host.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::Probe { url, reason } => {
        write!(f, "Could not resolve remote HEAD for {}: {}", url, reason)
      }
      GitError::MetadataFetch { url, sha, reason } => {
        write!(f, "Could not read commit {} from {}: {}", sha, url, reason)
      }
      GitError::Spawn { command, source } => {
        write!(f, "Failed to run {}: {}", command, source)
      }
    }
  }
}

/// Snapshot store errors
#[derive(Debug)]
pub enum SnapshotError {
  /// No snapshot file where one is required
  NotFound { path: PathBuf },

  /// Snapshot file is not a valid repository mapping
  Parse { path: PathBuf, reason: String },

  /// A mandatory repository entry is absent (or was never probed)
  MissingRequired { names: Vec<String> },
}

impl SnapshotError {
  fn help_message(&self) -> Option<String> {
    match self {
      SnapshotError::NotFound { .. } | SnapshotError::MissingRequired { .. } => {
        Some("Run `upstream-tracker check` first to populate the snapshot.".to_string())
      }
      SnapshotError::Parse { .. } => None,
    }
  }
}

impl fmt::Display for SnapshotError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SnapshotError::NotFound { path } => {
        write!(f, "{} not found", path.display())
      }
      SnapshotError::Parse { path, reason } => {
        write!(f, "Malformed snapshot {}: {}", path.display(), reason)
      }
      SnapshotError::MissingRequired { names } => {
        write!(f, "Missing {} info in snapshot", names.join(" or "))
      }
    }
  }
}

/// Automation output channel errors
#[derive(Debug)]
pub enum OutputError {
  /// A key was already emitted this run with a different value
  ConflictingKey {
    key: String,
    previous: String,
    value: String,
  },
}

impl fmt::Display for OutputError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OutputError::ConflictingKey { key, previous, value } => write!(
        f,
        "Output '{}' already emitted as '{}', refusing to emit '{}'",
        key, previous, value
      ),
    }
  }
}

/// Result type alias for upstream-tracker
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> TrackerResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<TrackerError>,
{
  fn with_context<F>(self, f: F) -> TrackerResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &TrackerError) {
  eprintln!("\n❌ Error: {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
