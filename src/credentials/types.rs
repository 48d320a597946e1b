//! Credential values and the errors raised while looking them up.

use std::fmt;

/// A username/password pair for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
  /// Confluence username
  pub username: String,
  /// Password or personal access token
  pub password: String,
}

impl Credential {
  pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
    }
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credential")
      .field("username", &self.username)
      .field("password", &"********")
      .finish()
  }
}

/// Errors that can occur during credential lookup.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
  /// The home directory could not be determined.
  #[error("could not determine home directory for .netrc lookup")]
  HomeNotFound,
  /// The .netrc file is malformed.
  #[error("failed to parse .netrc: {0}")]
  Parse(String),
  /// An I/O error occurred while reading credentials.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}
