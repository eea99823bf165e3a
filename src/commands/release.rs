//! `upstream-tracker release-info`: tag, zip name and release notes
//!
//! Reads the snapshot written by `check`; never modifies it.

use crate::core::context::TrackerContext;
use crate::core::error::{ResultExt, TrackerResult};
use crate::core::snapshot::Snapshot;
use crate::output::AutomationOutput;
use crate::release::{ReleaseIdentifiers, derive_release_identifiers};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Run the release-info command
pub fn run_release_info(
  ctx: &TrackerContext,
  state: Option<PathBuf>,
  notes: Option<PathBuf>,
  json: bool,
) -> TrackerResult<()> {
  let state_path = ctx.state_path(state.as_deref());
  let notes_path = ctx.notes_path(notes.as_deref());
  let mut output = AutomationOutput::from_env();

  let ids = execute_release_info(ctx, &state_path, &notes_path, &mut output, Utc::now())?;

  if json {
    println!("{}", serde_json::to_string_pretty(&ids)?);
  } else {
    println!("Generated release info:");
    println!("Tag: {}", ids.tag_name);
    println!("Zip: {}", ids.zip_name);
  }

  Ok(())
}

/// Derive, write the notes file, emit `tag_name`/`zip_name`
pub fn execute_release_info(
  ctx: &TrackerContext,
  state_path: &Path,
  notes_path: &Path,
  output: &mut AutomationOutput,
  now: DateTime<Utc>,
) -> TrackerResult<ReleaseIdentifiers> {
  let snapshot = Snapshot::load_existing(state_path)?;
  let ids = derive_release_identifiers(&snapshot, &ctx.config.release, &ctx.display_order(), now)?;

  if let Some(parent) = notes_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(notes_path, &ids.notes_table)
    .with_context(|| format!("Failed to write release notes to {}", notes_path.display()))?;
  tracing::debug!(path = %notes_path.display(), "release notes written");

  output.emit("tag_name", &ids.tag_name)?;
  output.emit("zip_name", &ids.zip_name)?;

  Ok(ids)
}
