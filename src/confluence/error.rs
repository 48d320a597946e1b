//! Error taxonomy for Confluence REST calls.

use reqwest::StatusCode;

/// Convenience alias used throughout the `confluence` module.
pub type Result<T, E = ConfluenceError> = std::result::Result<T, E>;

/// Everything that can go wrong while building or running a query.
///
/// Caller mistakes are reported as [`ConfluenceError::InvalidArgument`] before
/// any request is sent. Failures from the HTTP layer are passed through
/// untouched, and responses that do not match the expected shape surface as
/// [`ConfluenceError::Decode`] at the page where they occurred.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
  /// The caller supplied an invalid combination of arguments.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// Connection failure, timeout, or any other error raised by `reqwest`.
  #[error(transparent)]
  Transport(#[from] reqwest::Error),

  /// The server answered with a non-2xx status.
  #[error("Confluence API returned error {status} for {url}: {body}")]
  Status {
    /// HTTP status returned by the server.
    status: StatusCode,
    /// Request URL, including any query string.
    url: String,
    /// Raw response body, kept for diagnostics.
    body: String,
  },

  /// The body was not valid JSON or lacked an expected key.
  #[error("failed to decode response from {url}: {source}")]
  Decode {
    /// Request URL whose response failed to decode.
    url: String,
    /// Underlying serde error.
    #[source]
    source: serde_json::Error,
  },
}

impl ConfluenceError {
  pub(crate) fn invalid(message: impl Into<String>) -> Self {
    Self::InvalidArgument(message.into())
  }

  /// Whether this error was raised by argument validation, i.e. no request
  /// was issued.
  pub fn is_invalid_argument(&self) -> bool {
    matches!(self, Self::InvalidArgument(_))
  }

  /// HTTP status carried by the error, if the server produced one.
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Transport(err) => err.status(),
      _ => None,
    }
  }
}
