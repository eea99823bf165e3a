//! Core engine for upstream-tracker
//!
//! - **config**: tracked repositories and file locations (upstream.toml)
//! - **context**: configuration + working directory, built once in main
//! - **error**: error types with exit codes and help messages
//! - **snapshot**: persisted last-known state per repository
//! - **commit_url**: commit permalinks per hosting provider
//! - **reconcile**: remote heads vs snapshot, per-repository failure isolation
//! - **vcs**: remote revision queries through system git

pub mod commit_url;
pub mod config;
pub mod context;
pub mod error;
pub mod reconcile;
pub mod snapshot;
pub mod vcs;
