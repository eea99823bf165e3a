//! Release identifiers derived from the upstream snapshot
//!
//! # Invariants
//!
//! 1. **Read-only over the snapshot**: only `check` writes it
//! 2. **Mandatory entries**: the primary and secondary repositories (by default
//!    `opus-tools` and `opus`) must be present with a hash, or nothing is derived
//! 3. **Tag names are time-stamped**: the tag embeds the derivation's own UTC
//!    time, so re-deriving later gives a new tag even for the same snapshot.
//!    The zip name depends on snapshot content only.
//!
//! # Example
//!
//! ```text
//! tag_name: 2025-01-15_09-30_1a2b3c4
//! zip_name: opus-tools-1a2b3c4_opus-5d6e7f8.zip
//! ```

pub mod identifiers;
pub mod notes;

pub use identifiers::{ReleaseIdentifiers, derive_release_identifiers};
pub use notes::render_notes_table;
