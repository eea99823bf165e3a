//! `upstream-tracker status`: show the persisted snapshot without probing

use crate::core::context::TrackerContext;
use crate::core::error::TrackerResult;
use crate::core::snapshot::{RepositoryState, Snapshot};
use serde::Serialize;
use std::path::PathBuf;

/// One row of status output
#[derive(Debug, Serialize)]
struct RepositoryStatusRow<'a> {
  name: &'a str,
  url: &'a str,
  commit_hash: Option<&'a str>,
  commit_url: Option<&'a str>,
  commit_time: Option<&'a str>,
  #[serde(skip)]
  state: Option<&'a RepositoryState>,
}

/// Run the status command
pub fn run_status(ctx: &TrackerContext, state: Option<PathBuf>, json: bool) -> TrackerResult<()> {
  let state_path = ctx.state_path(state.as_deref());
  let snapshot = Snapshot::load(&state_path)?;

  let rows: Vec<RepositoryStatusRow> = ctx
    .config
    .repositories
    .iter()
    .map(|repo| {
      let state = snapshot.get(&repo.name);
      RepositoryStatusRow {
        name: &repo.name,
        url: &repo.url,
        commit_hash: state.and_then(RepositoryState::commit_hash),
        commit_url: state.map(|s| s.commit_url.as_str()).filter(|u| !u.is_empty()),
        commit_time: state.map(|s| s.commit_time.as_str()).filter(|t| !t.is_empty()),
        state,
      }
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&rows)?);
    return Ok(());
  }

  println!("📋 Upstream snapshot ({})", state_path.display());
  println!();

  let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
  for row in &rows {
    match row.state.filter(|s| s.commit_hash().is_some()) {
      Some(state) => println!(
        "  ✅ {:<width$}  {}  {}",
        row.name,
        state.short_hash(),
        state.commit_time,
        width = width
      ),
      None => println!("  ⚪ {:<width$}  never checked", row.name, width = width),
    }
  }

  Ok(())
}
