//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Local git repositories standing in for the upstream remotes
pub struct TestUpstreams {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestUpstreams {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Create an upstream repository with one commit, returning its URL
  pub fn create(&self, name: &str) -> Result<String> {
    let repo = self.repo_path(name);
    std::fs::create_dir_all(&repo)?;

    git(&repo, &["init", "--initial-branch=main"])?;
    git(&repo, &["config", "user.name", "Upstream Dev"])?;
    git(&repo, &["config", "user.email", "dev@example.com"])?;

    std::fs::write(repo.join("README"), format!("{}\n", name))?;
    git(&repo, &["add", "."])?;
    git(&repo, &["commit", "-m", "Initial import"])?;

    Ok(self.url(name))
  }

  /// Add a commit to an upstream repository, returning its SHA
  pub fn advance(&self, name: &str, message: &str) -> Result<String> {
    let repo = self.repo_path(name);
    let file = repo.join("CHANGES");
    let mut content = std::fs::read_to_string(&file).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&file, content)?;

    git(&repo, &["add", "."])?;
    git(&repo, &["commit", "-m", message])?;
    self.head(name)
  }

  /// Current HEAD SHA of an upstream repository
  pub fn head(&self, name: &str) -> Result<String> {
    let output = git(&self.repo_path(name), &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Committer date of HEAD as `%ci`
  pub fn head_time(&self, name: &str) -> Result<String> {
    let output = git(&self.repo_path(name), &["show", "-s", "--format=%ci", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Delete HEAD's root tree object so refs still resolve but the commit
  /// can no longer be cloned
  pub fn corrupt_head_tree(&self, name: &str) -> Result<()> {
    let repo = self.repo_path(name);
    let output = git(&repo, &["rev-parse", "HEAD^{tree}"])?;
    let tree = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let object = repo.join(".git").join("objects").join(&tree[..2]).join(&tree[2..]);
    std::fs::remove_file(&object).with_context(|| format!("loose tree object {} missing", object.display()))?;
    Ok(())
  }

  /// URL for an upstream (file:// so shallow clones are honoured)
  pub fn url(&self, name: &str) -> String {
    format!("file://{}", self.repo_path(name).display())
  }

  /// URL that can never be reached
  pub fn unreachable_url(&self, name: &str) -> String {
    format!("file://{}", self.path.join("missing").join(name).display())
  }

  fn repo_path(&self, name: &str) -> PathBuf {
    self.path.join(name)
  }
}

/// Directory the tracker runs in, with its own upstream.toml
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write upstream.toml tracking `repos` in the given order
  pub fn write_config(&self, repos: &[(&str, String)]) -> Result<()> {
    let mut config = String::new();
    for (name, url) in repos {
      config.push_str(&format!("[[repositories]]\nname = \"{}\"\nurl = \"{}\"\n\n", name, url));
    }
    std::fs::write(self.path.join("upstream.toml"), config)?;
    Ok(())
  }

  pub fn state_path(&self) -> PathBuf {
    self.path.join(".github").join("upstream-version.json")
  }

  pub fn output_path(&self) -> PathBuf {
    self.path.join("github_output")
  }

  /// Parsed snapshot file
  pub fn read_state(&self) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(self.state_path()).context("snapshot missing")?;
    Ok(serde_json::from_str(&content)?)
  }

  /// Lines written to the automation output file
  pub fn output_lines(&self) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(self.output_path()).unwrap_or_default();
    Ok(content.lines().map(String::from).collect())
  }

  /// Truncate the automation output file between runs
  pub fn clear_output(&self) -> Result<()> {
    std::fs::write(self.output_path(), "")?;
    Ok(())
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Run the tracker with `$GITHUB_OUTPUT` pointing into the workspace
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    run_tracker_raw(&self.path, args, Some(&self.output_path()))
  }

  /// Like [`TestWorkspace::run`] but fails on a non-zero exit
  pub fn run_ok(&self, args: &[&str]) -> Result<Output> {
    let output = self.run(args)?;
    if !output.status.success() {
      anyhow::bail!(
        "upstream-tracker {} failed\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
      );
    }
    Ok(output)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the upstream-tracker binary without checking its exit status
pub fn run_tracker_raw(cwd: &Path, args: &[&str], github_output: Option<&Path>) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_upstream-tracker");

  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args).env_remove("GITHUB_OUTPUT").env_remove("UPSTREAM_TRACKER_LOG");
  if let Some(path) = github_output {
    cmd.env("GITHUB_OUTPUT", path);
  }

  cmd.output().context("Failed to run upstream-tracker")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
