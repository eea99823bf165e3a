//! `upstream-tracker check`: reconcile remote heads with the snapshot
//!
//! Always rewrites the snapshot and always exits zero unless the snapshot
//! itself cannot be written. Unreachable remotes are logged, not fatal.

use crate::core::context::TrackerContext;
use crate::core::error::TrackerResult;
use crate::core::reconcile::{ReconcileOutcome, RepositoryReport, reconcile};
use crate::core::snapshot::{RepositoryState, Snapshot};
use crate::core::vcs::{RevisionSource, SystemGit};
use crate::output::AutomationOutput;
use crate::utils::hash_output_key;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON report for `check --json`
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
  updated: bool,
  repositories: &'a [RepositoryReport],
}

/// Run the check command
pub fn run_check(ctx: &TrackerContext, state: Option<PathBuf>, json: bool) -> TrackerResult<()> {
  let state_path = ctx.state_path(state.as_deref());
  let mut output = AutomationOutput::from_env();

  let outcome = execute_check(ctx, &SystemGit::new(), &state_path, &mut output)?;

  if json {
    let report = CheckReport {
      updated: outcome.any_updated,
      repositories: &outcome.reports,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else if outcome.any_updated {
    println!("Updates detected.");
  } else {
    println!("No updates detected.");
  }

  Ok(())
}

/// Load, reconcile, persist, emit. Separated from printing for tests.
pub fn execute_check<S: RevisionSource>(
  ctx: &TrackerContext,
  source: &S,
  state_path: &Path,
  output: &mut AutomationOutput,
) -> TrackerResult<ReconcileOutcome> {
  let prior = Snapshot::load(state_path)?;
  if prior.is_empty() {
    tracing::info!("No prior snapshot; every reachable repository counts as updated");
  }
  let outcome = reconcile(source, &ctx.config.repositories, &prior);

  outcome.snapshot.save(state_path)?;

  let failed = outcome.failed_count();
  if failed > 0 {
    tracing::warn!(
      "{} of {} repositories could not be checked; their previous state was kept",
      failed,
      outcome.reports.len()
    );
  }

  emit_check_outputs(output, &outcome.snapshot, outcome.any_updated, &ctx.display_order())?;
  if let Some(path) = output.path() {
    tracing::debug!(path = %path.display(), keys = output.emitted().len(), "automation outputs written");
  }
  Ok(outcome)
}

/// `upstream_updated` plus one `<name>_hash` per probed repository
fn emit_check_outputs(
  output: &mut AutomationOutput,
  snapshot: &Snapshot,
  any_updated: bool,
  display_order: &[&str],
) -> TrackerResult<()> {
  output.emit("upstream_updated", if any_updated { "true" } else { "false" })?;

  for name in display_order {
    if let Some(hash) = snapshot.get(name).and_then(RepositoryState::commit_hash) {
      output.emit(&hash_output_key(name), hash)?;
    }
  }

  Ok(())
}
