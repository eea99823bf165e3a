pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::GitError;

/// Where the reconciler gets remote revision data from
///
/// [`SystemGit`] is the real implementation; tests substitute fakes.
pub trait RevisionSource {
  /// Full id of the remote's default-branch head
  fn remote_head(&self, url: &str) -> Result<String, GitError>;

  /// Committer timestamp of `sha` as git prints it (`%ci`)
  fn commit_time(&self, url: &str, sha: &str) -> Result<String, GitError>;
}
