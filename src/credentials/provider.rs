//! Credential provider abstractions.

use super::{Credential, CredentialError};

/// A source of credentials keyed by host name.
pub trait CredentialsProvider {
  /// Retrieves credentials for the specified host.
  ///
  /// # Returns
  /// * `Ok(Some(Credential))` when the provider has an entry for the host.
  /// * `Ok(None)` when it has none, so callers can try another source.
  ///
  /// # Errors
  /// Returns `Err(CredentialError)` when the underlying source cannot be read.
  fn get_credentials(&self, host: &str) -> Result<Option<Credential>, CredentialError>;
}
