//! Integration tests for `upstream-tracker status`

use crate::helpers::{TestUpstreams, TestWorkspace, stdout};
use anyhow::Result;

#[test]
fn test_status_before_and_after_check() -> Result<()> {
  let upstreams = TestUpstreams::new()?;
  let workspace = TestWorkspace::new()?;
  workspace.write_config(&[
    ("opus-tools", upstreams.create("opus-tools")?),
    ("opus", upstreams.create("opus")?),
    ("flac", upstreams.unreachable_url("flac")),
  ])?;

  let before = workspace.run_ok(&["status"])?;
  assert_eq!(stdout(&before).matches("never checked").count(), 3);

  workspace.run_ok(&["check"])?;

  let after = workspace.run_ok(&["status", "--json"])?;
  let rows: serde_json::Value = serde_json::from_str(&stdout(&after))?;
  let rows = rows.as_array().expect("rows array");

  assert_eq!(rows.len(), 3);
  assert_eq!(rows[0]["name"], "opus-tools");
  assert_eq!(rows[0]["commit_hash"], upstreams.head("opus-tools")?.as_str());
  assert_eq!(rows[1]["commit_time"], upstreams.head_time("opus")?.as_str());
  assert_eq!(rows[2]["name"], "flac");
  assert!(rows[2]["commit_hash"].is_null());

  // status never writes
  let snapshot = std::fs::read(workspace.state_path())?;
  workspace.run_ok(&["status"])?;
  assert_eq!(std::fs::read(workspace.state_path())?, snapshot);

  Ok(())
}
