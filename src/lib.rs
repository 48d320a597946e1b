//! Read-only client for the Confluence REST API.
//!
//! The [`confluence`] module holds the typed client, its query builders and
//! the lazy pager; the remaining modules make up the `confluence-query`
//! command-line tool built on top of it.

pub mod cli;
pub mod color;
pub mod commands;
pub mod confluence;
pub mod credentials;
pub mod format;
