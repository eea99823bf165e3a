//! Reconciliation of remote heads against the persisted snapshot
//!
//! Each tracked repository is handled independently:
//!
//! ```text
//! probe fails           -> prior entry carried forward untouched (or stays absent)
//! remote == cached      -> unchanged; commit_url re-derived from the stored hash
//! remote != cached      -> updated; commit time fetched (wall clock on failure)
//! ```
//!
//! A failure for one repository never stops the others, and never fails the
//! run. The caller persists [`ReconcileOutcome::snapshot`] in one write.

use crate::core::commit_url::derive_commit_url;
use crate::core::config::TrackedRepository;
use crate::core::snapshot::{RepositoryState, Snapshot};
use crate::core::vcs::RevisionSource;
use chrono::Local;
use serde::Serialize;

/// What happened to one repository during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RepositoryStatus {
  /// Head moved (or was seen for the first time)
  Updated {
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<String>,
  },
  /// Head matches the snapshot
  Unchanged,
  /// Probe failed; prior state kept
  Failed { reason: String },
}

/// Per-repository line of a run report
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
  pub name: String,
  #[serde(flatten)]
  pub status: RepositoryStatus,
  /// Hash stored in the new snapshot, if any
  pub commit_hash: Option<String>,
}

/// Result of a reconciliation pass
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
  /// Full replacement snapshot covering the tracked set
  pub snapshot: Snapshot,
  /// True if at least one repository was updated
  pub any_updated: bool,
  /// One entry per tracked repository, in tracked order
  pub reports: Vec<RepositoryReport>,
}

impl ReconcileOutcome {
  pub fn failed_count(&self) -> usize {
    self
      .reports
      .iter()
      .filter(|r| matches!(r.status, RepositoryStatus::Failed { .. }))
      .count()
  }
}

/// Compare every tracked repository's remote head with `prior`.
///
/// Sequential; the returned snapshot is independent of iteration order.
pub fn reconcile<S: RevisionSource>(source: &S, repos: &[TrackedRepository], prior: &Snapshot) -> ReconcileOutcome {
  let mut snapshot = Snapshot::new();
  let mut reports = Vec::with_capacity(repos.len());
  let mut any_updated = false;

  for repo in repos {
    let previous = prior.get(&repo.name);
    let cached_hash = previous.and_then(RepositoryState::commit_hash);

    tracing::info!("Checking {}...", repo.name);
    let remote_hash = match source.remote_head(&repo.url) {
      Ok(hash) => hash,
      Err(err) => {
        tracing::warn!("Failed to check {}: {}", repo.name, err);
        if let Some(state) = previous {
          snapshot.insert(repo.name.clone(), state.clone());
        }
        reports.push(RepositoryReport {
          name: repo.name.clone(),
          status: RepositoryStatus::Failed { reason: err.to_string() },
          commit_hash: cached_hash.map(str::to_string),
        });
        continue;
      }
    };

    let status = if cached_hash == Some(remote_hash.as_str()) {
      // Same head: refresh the derived link only
      let mut state = previous.cloned().unwrap_or_default();
      state.name = repo.name.clone();
      state.url = repo.url.clone();
      state.commit_url = derive_commit_url(&repo.url, &remote_hash);
      snapshot.insert(repo.name.clone(), state);
      RepositoryStatus::Unchanged
    } else {
      tracing::info!(
        "Update found for {}: {} -> {}",
        repo.name,
        cached_hash.unwrap_or("<none>"),
        remote_hash
      );
      any_updated = true;

      let commit_time = match source.commit_time(&repo.url, &remote_hash) {
        Ok(time) => time,
        Err(err) => {
          let now = fallback_commit_time();
          tracing::warn!("Failed to get details for {}: {}; using {}", repo.name, err, now);
          now
        }
      };

      snapshot.insert(
        repo.name.clone(),
        RepositoryState {
          name: repo.name.clone(),
          url: repo.url.clone(),
          commit_url: derive_commit_url(&repo.url, &remote_hash),
          hash: remote_hash.clone(),
          commit_time,
        },
      );
      RepositoryStatus::Updated {
        previous: cached_hash.map(str::to_string),
      }
    };

    reports.push(RepositoryReport {
      name: repo.name.clone(),
      status,
      commit_hash: Some(remote_hash),
    });
  }

  ReconcileOutcome {
    snapshot,
    any_updated,
    reports,
  }
}

/// Stand-in commit time when the commit details cannot be fetched.
///
/// This is the local wall clock, not the commit's real time.
// TODO: record the fallback explicitly in RepositoryState so release notes can mark it as approximate
fn fallback_commit_time() -> String {
  Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
