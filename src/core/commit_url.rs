//! Web permalinks for commits
//!
//! Hosts are matched by substring against the repository base address. This is
//! a heuristic: anything unrecognised gets the GitHub-style `/commit/` path,
//! which is wrong for some hosts. Adding a provider means adding a row to
//! [`PROVIDERS`].

use crate::utils::trim_git_suffix;

/// A hosting provider's commit link shape
struct Provider {
  /// Substring looked for in the base address
  marker: &'static str,
  /// Path inserted between the base address and the hash
  commit_path: &'static str,
}

/// Checked in order; first match wins
const PROVIDERS: &[Provider] = &[
  Provider {
    marker: "gitlab",
    commit_path: "/-/commit/",
  },
  Provider {
    marker: "bitbucket",
    commit_path: "/commits/",
  },
];

/// GitHub, Gitea, Gitee and unrecognised hosts
const DEFAULT_COMMIT_PATH: &str = "/commit/";

/// Build a browser link for `commit_hash` in the repository at `repo_url`
pub fn derive_commit_url(repo_url: &str, commit_hash: &str) -> String {
  let base = trim_git_suffix(repo_url.trim_end_matches('/'));

  let commit_path = PROVIDERS
    .iter()
    .find(|p| base.contains(p.marker))
    .map(|p| p.commit_path)
    .unwrap_or(DEFAULT_COMMIT_PATH);

  format!("{}{}{}", base, commit_path, commit_hash)
}
