//! Credential discovery for Confluence basic authentication.
//!
//! Credentials are resolved from a trait-based provider so the CLI can fall
//! back from explicit flags to other sources. The default implementation
//! reads `~/.netrc`:
//!
//! ```text
//! machine wiki.example.com
//!   login jdoe
//!   password your-password-or-token
//! ```
//!
//! On Confluence Server and Data Center the password may be a personal access
//! token; basic auth is used either way.

mod netrc;
mod provider;
mod types;

pub use netrc::NetrcProvider;
pub use provider::CredentialsProvider;
pub use types::{Credential, CredentialError};
