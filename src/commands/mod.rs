//! CLI commands for upstream-tracker
//!
//! - **check**: probe every tracked repository, rewrite the snapshot, emit `upstream_updated`
//! - **release**: derive tag/zip names and the notes table from the snapshot
//! - **status**: print the snapshot without touching the network
//!
//! All commands accept `&TrackerContext` built once in main.

pub mod check;
pub mod release;
pub mod status;

pub use check::run_check;
pub use release::run_release_info;
pub use status::run_status;
