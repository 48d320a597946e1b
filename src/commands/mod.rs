//! CLI subcommand handlers.
//!
//! Each `confluence-query` subcommand lives in its own module so `cli.rs`
//! stays a thin dispatcher.

pub mod auth;
pub mod completions;
pub mod query;
pub mod version;
