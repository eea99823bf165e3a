//! Markdown changelog table for a release

use crate::core::snapshot::Snapshot;
use crate::utils::trim_git_suffix;

const HEADER: &str = "| Repository | Commit | Time |";
const SEPARATOR: &str = "| --- | --- | --- |";

/// Render one row per repository present in `snapshot`, in `display_order`.
///
/// Absent repositories are skipped. Commit times are copied verbatim.
pub fn render_notes_table(snapshot: &Snapshot, display_order: &[&str]) -> String {
  let mut lines = vec![HEADER.to_string(), SEPARATOR.to_string()];

  for name in display_order {
    let Some(state) = snapshot.get(name) else {
      continue;
    };

    let display_name = if state.name.is_empty() { *name } else { state.name.as_str() };
    let repo_cell = if state.url.is_empty() {
      display_name.to_string()
    } else {
      format!("[{}]({})", display_name, trim_git_suffix(&state.url))
    };

    let short = state.short_hash();
    let commit_cell = if state.commit_url.is_empty() {
      short.to_string()
    } else {
      format!("[{}]({})", short, state.commit_url)
    };

    lines.push(format!("| {} | {} | {} |", repo_cell, commit_cell, state.commit_time));
  }

  lines.join("\n")
}
