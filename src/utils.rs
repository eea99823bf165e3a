//! Small string helpers shared by the reconciler and the release deriver

/// Number of hash characters shown in names and tables
pub const SHORT_HASH_LEN: usize = 7;

/// First seven characters of a commit id (or the whole id if shorter)
pub fn short_hash(hash: &str) -> &str {
  match hash.char_indices().nth(SHORT_HASH_LEN) {
    Some((idx, _)) => &hash[..idx],
    None => hash,
  }
}

/// Strip one trailing `.git` from a repository address
pub fn trim_git_suffix(url: &str) -> &str {
  url.strip_suffix(".git").unwrap_or(url)
}

/// Automation output key for a repository hash (`opus-tools` -> `opus_tools_hash`)
pub fn hash_output_key(name: &str) -> String {
  format!("{}_hash", name.replace('-', "_"))
}

/// Whether a string looks like a full git object id (SHA-1 or SHA-256)
pub fn is_full_object_id(id: &str) -> bool {
  (id.len() == 40 || id.len() == 64) && id.chars().all(|c| c.is_ascii_hexdigit())
}
