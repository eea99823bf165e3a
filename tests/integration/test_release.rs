//! Integration tests for `upstream-tracker release-info`

use crate::helpers::{TestUpstreams, TestWorkspace, stderr, stdout};
use anyhow::Result;

fn short(hash: &str) -> &str {
  &hash[..7]
}

/// Tag format: YYYY-MM-DD_HH-MM_<short>
fn assert_tag_shape(tag: &str, short_hash: &str) {
  let (stamp, suffix) = tag.rsplit_once('_').expect("tag has a hash suffix");
  assert_eq!(suffix, short_hash);
  assert_eq!(stamp.len(), "2025-01-01_00-00".len(), "unexpected stamp: {}", stamp);
  let bytes = stamp.as_bytes();
  assert_eq!(bytes[4], b'-');
  assert_eq!(bytes[7], b'-');
  assert_eq!(bytes[10], b'_');
  assert_eq!(bytes[13], b'-');
}

#[test]
fn test_release_info_after_check() -> Result<()> {
  let upstreams = TestUpstreams::new()?;
  let workspace = TestWorkspace::new()?;
  workspace.write_config(&[
    ("opus-tools", upstreams.create("opus-tools")?),
    ("opus", upstreams.create("opus")?),
    ("ogg", upstreams.create("ogg")?),
  ])?;

  workspace.run_ok(&["check"])?;
  workspace.clear_output()?;

  let tools = upstreams.head("opus-tools")?;
  let opus = upstreams.head("opus")?;

  let output = workspace.run_ok(&["release-info"])?;
  let out = stdout(&output);
  let lines: Vec<&str> = out.lines().collect();
  assert_eq!(lines[0], "Generated release info:");
  let tag = lines[1].strip_prefix("Tag: ").expect("tag line");
  assert_tag_shape(tag, short(&tools));
  let zip = format!("opus-tools-{}_opus-{}.zip", short(&tools), short(&opus));
  assert_eq!(lines[2], format!("Zip: {}", zip));

  let notes = workspace.read_file("release_notes.md")?;
  let rows: Vec<&str> = notes.lines().collect();
  assert_eq!(rows[0], "| Repository | Commit | Time |");
  assert_eq!(rows[1], "| --- | --- | --- |");
  assert_eq!(rows.len(), 5);
  assert!(rows[2].starts_with("| [opus-tools]("));
  assert!(rows[3].starts_with("| [opus]("));
  assert!(rows[4].starts_with("| [ogg]("));
  assert!(rows[3].contains(&format!("[{}]({}/commit/{})", short(&opus), upstreams.url("opus"), opus)));
  assert!(!notes.ends_with('\n'));

  let outputs = workspace.output_lines()?;
  assert_eq!(outputs, vec![format!("tag_name={}", tag), format!("zip_name={}", zip)]);

  Ok(())
}

#[test]
fn test_rows_follow_config_order_not_file_order() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_config(&[
    ("opus-tools", "https://gitlab.xiph.org/xiph/opus-tools.git".to_string()),
    ("opus", "https://gitlab.xiph.org/xiph/opus.git".to_string()),
    ("flac", "https://gitlab.xiph.org/xiph/flac.git".to_string()),
  ])?;

  // Hand-written snapshot: flac first, no commit_url for opus
  std::fs::create_dir_all(workspace.path.join(".github"))?;
  std::fs::write(
    workspace.state_path(),
    format!(
      r#"{{
  "flac": {{ "name": "flac", "url": "https://gitlab.xiph.org/xiph/flac.git", "commit_hash": "{c}", "commit_url": "https://gitlab.xiph.org/xiph/flac/-/commit/{c}", "commit_time": "2024-03-03 03:03:03 +0000" }},
  "opus": {{ "name": "opus", "url": "https://gitlab.xiph.org/xiph/opus.git", "commit_hash": "{b}", "commit_time": "2024-02-02 02:02:02 +0000" }},
  "opus-tools": {{ "name": "opus-tools", "url": "https://gitlab.xiph.org/xiph/opus-tools.git", "commit_hash": "{a}", "commit_url": "https://gitlab.xiph.org/xiph/opus-tools/-/commit/{a}", "commit_time": "2024-01-01 01:01:01 +0000" }}
}}"#,
      a = "a".repeat(40),
      b = "b".repeat(40),
      c = "c".repeat(40)
    ),
  )?;

  workspace.run_ok(&["release-info"])?;

  let notes = workspace.read_file("release_notes.md")?;
  let rows: Vec<&str> = notes.lines().skip(2).collect();
  assert_eq!(
    rows,
    vec![
      format!(
        "| [opus-tools](https://gitlab.xiph.org/xiph/opus-tools) | [aaaaaaa](https://gitlab.xiph.org/xiph/opus-tools/-/commit/{}) | 2024-01-01 01:01:01 +0000 |",
        "a".repeat(40)
      ),
      "| [opus](https://gitlab.xiph.org/xiph/opus) | bbbbbbb | 2024-02-02 02:02:02 +0000 |".to_string(),
      format!(
        "| [flac](https://gitlab.xiph.org/xiph/flac) | [ccccccc](https://gitlab.xiph.org/xiph/flac/-/commit/{}) | 2024-03-03 03:03:03 +0000 |",
        "c".repeat(40)
      ),
    ]
  );

  Ok(())
}

#[test]
fn test_release_info_without_snapshot() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = workspace.run(&["release-info"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("not found"));
  assert!(!workspace.path.join("release_notes.md").exists());
  assert!(workspace.output_lines()?.is_empty());

  Ok(())
}

#[test]
fn test_release_info_missing_secondary() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_config(&[
    ("opus-tools", "https://gitlab.xiph.org/xiph/opus-tools.git".to_string()),
    ("opus", "https://gitlab.xiph.org/xiph/opus.git".to_string()),
  ])?;

  std::fs::create_dir_all(workspace.path.join(".github"))?;
  std::fs::write(
    workspace.state_path(),
    format!(
      r#"{{ "opus-tools": {{ "name": "opus-tools", "url": "https://gitlab.xiph.org/xiph/opus-tools.git", "commit_hash": "{}", "commit_time": "2024-01-01 01:01:01 +0000" }} }}"#,
      "a".repeat(40)
    ),
  )?;

  let output = workspace.run(&["release-info"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Missing opus info in snapshot"));
  assert!(!workspace.path.join("release_notes.md").exists());

  Ok(())
}

#[test]
fn test_release_info_json() -> Result<()> {
  let upstreams = TestUpstreams::new()?;
  let workspace = TestWorkspace::new()?;
  workspace.write_config(&[
    ("opus-tools", upstreams.create("opus-tools")?),
    ("opus", upstreams.create("opus")?),
  ])?;

  workspace.run_ok(&["check"])?;
  let output = workspace.run_ok(&["release-info", "--json", "--notes", "out/notes.md"])?;
  let ids: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  let tools = upstreams.head("opus-tools")?;
  assert_tag_shape(ids["tag_name"].as_str().expect("tag_name"), short(&tools));
  assert_eq!(
    ids["zip_name"],
    format!("opus-tools-{}_opus-{}.zip", short(&tools), short(&upstreams.head("opus")?)).as_str()
  );
  assert_eq!(ids["notes_table"], workspace.read_file("out/notes.md")?.as_str());

  Ok(())
}
