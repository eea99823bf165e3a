//! System git backend for remote revision queries
//!
//! Two operations, both plain git plumbing:
//! - `ls-remote <url> HEAD` resolves the default-branch head without fetching
//! - a bare, depth-1, blob-less clone into a scoped temp dir answers
//!   `show -s --format=%ci <sha>`
//!
//! Every subprocess runs with an isolated environment so user config and
//! credential prompts cannot change the outcome.

use super::RevisionSource;
use crate::core::error::GitError;
use crate::utils::is_full_object_id;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Network settings forwarded to git despite the cleared environment
///
/// Every call talks to a remote, so proxies, custom CAs and SSH agents
/// must survive isolation.
const NETWORK_ENV: &[&str] = &[
  "HTTPS_PROXY",
  "https_proxy",
  "HTTP_PROXY",
  "http_proxy",
  "ALL_PROXY",
  "all_proxy",
  "NO_PROXY",
  "no_proxy",
  "GIT_SSL_CAINFO",
  "GIT_SSL_CAPATH",
  "SSL_CERT_FILE",
  "SSL_CERT_DIR",
  "SSH_AUTH_SOCK",
  "GIT_SSH_COMMAND",
];

/// Git backend using system git (zero crate dependencies)
#[derive(Debug, Default, Clone)]
pub struct SystemGit {
  /// Parent directory for temporary checkouts (system temp dir when unset)
  scratch_dir: Option<PathBuf>,
}

impl SystemGit {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create temporary checkouts under `dir` instead of the system temp dir
  #[cfg(test)]
  pub fn with_scratch_dir(dir: impl Into<PathBuf>) -> Self {
    Self {
      scratch_dir: Some(dir.into()),
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Clears environment variables
  /// - Whitelists PATH, HOME and the network settings in [`NETWORK_ENV`]
  /// - Disables terminal prompts so unreachable remotes fail fast
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    self.git_cmd_with(|key| std::env::var_os(key))
  }

  fn git_cmd_with<F>(&self, lookup: F) -> Command
  where
    F: Fn(&str) -> Option<OsString>,
  {
    let mut cmd = Command::new("git");

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    for key in ["PATH", "HOME"].iter().chain(NETWORK_ENV) {
      if let Some(value) = lookup(key) {
        cmd.env(key, value);
      }
    }
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Run `git <args>` and return stdout, mapping failures with `on_fail`
  fn run<F>(&self, cmd: &mut Command, label: &str, on_fail: F) -> Result<String, GitError>
  where
    F: FnOnce(String) -> GitError,
  {
    let output: Output = cmd.output().map_err(|source| GitError::Spawn {
      command: label.to_string(),
      source,
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(on_fail(if stderr.is_empty() {
        format!("{} exited with {}", label, output.status)
      } else {
        stderr
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Clone `url` bare, one commit deep and without blobs, into `dest`
  fn shallow_clone(&self, url: &str, dest: &Path) -> Result<(), GitError> {
    let mut cmd = self.git_cmd();
    cmd
      .args(["clone", "--quiet", "--bare", "--depth", "1", "--filter=blob:none", url])
      .arg(dest);

    self.run(&mut cmd, "git clone", |reason| GitError::MetadataFetch {
      url: url.to_string(),
      sha: String::new(),
      reason,
    })?;
    Ok(())
  }
}

impl RevisionSource for SystemGit {
  fn remote_head(&self, url: &str) -> Result<String, GitError> {
    let mut cmd = self.git_cmd();
    cmd.args(["ls-remote", url, "HEAD"]);

    let stdout = self.run(&mut cmd, "git ls-remote", |reason| GitError::Probe {
      url: url.to_string(),
      reason,
    })?;

    parse_ls_remote_head(&stdout).ok_or_else(|| GitError::Probe {
      url: url.to_string(),
      reason: if stdout.is_empty() {
        "remote has no HEAD".to_string()
      } else {
        format!("unexpected ls-remote output: {}", stdout)
      },
    })
  }

  fn commit_time(&self, url: &str, sha: &str) -> Result<String, GitError> {
    // Dropped (and deleted) on every return path below
    let checkout = match &self.scratch_dir {
      Some(dir) => TempDir::new_in(dir),
      None => TempDir::new(),
    }
    .map_err(|err| GitError::MetadataFetch {
      url: url.to_string(),
      sha: sha.to_string(),
      reason: format!("could not create temporary directory: {}", err),
    })?;

    tracing::debug!(url, dir = %checkout.path().display(), "fetching commit details");
    self.shallow_clone(url, checkout.path()).map_err(|err| match err {
      GitError::MetadataFetch { url, reason, .. } => GitError::MetadataFetch {
        url,
        sha: sha.to_string(),
        reason,
      },
      other => other,
    })?;

    let mut cmd = self.git_cmd();
    cmd
      .arg("-C")
      .arg(checkout.path())
      .args(["show", "-s", "--format=%ci", sha]);

    let time = self.run(&mut cmd, "git show", |reason| GitError::MetadataFetch {
      url: url.to_string(),
      sha: sha.to_string(),
      reason,
    })?;

    if time.is_empty() {
      return Err(GitError::MetadataFetch {
        url: url.to_string(),
        sha: sha.to_string(),
        reason: "empty commit date".to_string(),
      });
    }

    Ok(time)
  }
}

/// First object id in `git ls-remote <url> HEAD` output
///
/// Format: `<sha>\tHEAD`, one line per matching ref.
fn parse_ls_remote_head(stdout: &str) -> Option<String> {
  stdout
    .lines()
    .next()
    .and_then(|line| line.split_whitespace().next())
    .filter(|sha| is_full_object_id(sha))
    .map(str::to_string)
}
