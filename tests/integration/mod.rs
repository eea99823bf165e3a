//! Integration tests for upstream-tracker
//!
//! Upstreams are local git repositories served over file:// URLs.

mod helpers;
mod test_release;
mod test_status;
