//! Tag name, archive name and notes table for a release

use crate::core::config::ReleaseNaming;
use crate::core::error::{SnapshotError, TrackerResult};
use crate::core::snapshot::{RepositoryState, Snapshot};
use crate::release::render_notes_table;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Values handed to the release job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseIdentifiers {
  /// `YYYY-MM-DD_HH-MM_<primary short hash>`, UTC derivation time
  pub tag_name: String,
  /// `<primary>-<short>_<secondary>-<short>.zip`
  pub zip_name: String,
  /// Markdown table, see [`render_notes_table`]
  pub notes_table: String,
}

/// Derive release identifiers from `snapshot` as of `now`.
///
/// Fails without producing anything if the primary or secondary repository
/// has no entry (or an entry that was never probed).
pub fn derive_release_identifiers(
  snapshot: &Snapshot,
  naming: &ReleaseNaming,
  display_order: &[&str],
  now: DateTime<Utc>,
) -> TrackerResult<ReleaseIdentifiers> {
  let (primary, secondary) = match (
    required(snapshot, &naming.primary),
    required(snapshot, &naming.secondary),
  ) {
    (Some(primary), Some(secondary)) => (primary, secondary),
    (primary, secondary) => {
      let mut names = Vec::new();
      if primary.is_none() {
        names.push(naming.primary.clone());
      }
      if secondary.is_none() {
        names.push(naming.secondary.clone());
      }
      return Err(SnapshotError::MissingRequired { names }.into());
    }
  };

  let tag_name = format!("{}_{}", now.format("%Y-%m-%d_%H-%M"), primary.short_hash());
  let zip_name = format!(
    "{}-{}_{}-{}.zip",
    naming.primary,
    primary.short_hash(),
    naming.secondary,
    secondary.short_hash()
  );
  let notes_table = render_notes_table(snapshot, display_order);

  Ok(ReleaseIdentifiers {
    tag_name,
    zip_name,
    notes_table,
  })
}

fn required<'a>(snapshot: &'a Snapshot, name: &str) -> Option<&'a RepositoryState> {
  snapshot.get(name).filter(|state| state.commit_hash().is_some())
}
