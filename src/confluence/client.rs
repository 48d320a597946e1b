//! HTTP client for the Confluence REST API.
//!
//! [`Confluence`] can be used directly, in which case every request opens and
//! discards its own connection, or through a [`Session`] guard that keeps one
//! pooled connection alive until it is closed or dropped.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::error::{ConfluenceError, Result};
use super::pager::{self, Pager, hydrate};
use super::query::{ApiRequest, Params};

/// Confluence API client.
pub struct Confluence {
  base_url: String,
  api_base: String,
  username: String,
  password: String,
  timeout: Option<Duration>,
  http: Option<reqwest::Client>,
}

impl Confluence {
  /// Create a client for the Confluence instance at `base_url`.
  ///
  /// # Arguments
  /// * `base_url` - Where the Confluence web app lives, e.g. `https://wiki.example.com/confluence`
  /// * `username` - Basic auth user
  /// * `password` - Basic auth password or personal access token
  ///
  /// No request timeout is applied unless [`Confluence::with_timeout`] is
  /// used; a stalled server blocks the awaiting call indefinitely.
  pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    let api_base = format!("{base_url}/rest/api");

    Self {
      base_url,
      api_base,
      username: username.into(),
      password: password.into(),
      timeout: None,
      http: None,
    }
  }

  /// Apply a per-request timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Base URL of the instance, without a trailing slash.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Root of the REST API (`{base_url}/rest/api`).
  pub fn api_base(&self) -> &str {
    &self.api_base
  }

  /// Whether requests reuse a pooled connection.
  pub fn is_session(&self) -> bool {
    self.http.is_some()
  }

  /// Open a session that reuses one connection pool for every call made
  /// through it.
  ///
  /// The pool is released when the returned guard is closed or dropped.
  /// Result streams borrow the session, so they cannot outlive it.
  ///
  /// # Errors
  /// Returns an error if the underlying `reqwest::Client` cannot be built.
  pub fn session(&self) -> Result<Session> {
    let http = self.build_http_client()?;
    trace!("Opening Confluence session for {}", self.api_base);

    Ok(Session {
      inner: Confluence {
        base_url: self.base_url.clone(),
        api_base: self.api_base.clone(),
        username: self.username.clone(),
        password: self.password.clone(),
        timeout: self.timeout,
        http: Some(http),
      },
    })
  }

  /// Fetch a single object.
  ///
  /// Issues exactly one GET to `{api_base}/{path}` and hydrates the body into
  /// `T`.
  ///
  /// # Errors
  /// Propagates transport, status and decode failures as-is; nothing is
  /// retried.
  pub async fn fetch_one<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
    let url = self.api_url(&request.path);
    let body: serde_json::Value = self.get_json(&url, &request.query_params()).await?;
    hydrate(body).map_err(|source| ConfluenceError::Decode { url, source })
  }

  /// Lazily fetch every object of a paginated collection.
  ///
  /// See [`Pager`] for the pagination rules.
  pub fn paginate<'a, T>(&'a self, request: &ApiRequest) -> Pager<'a, T>
  where
    T: DeserializeOwned + Send + 'a,
  {
    pager::paginate(self, request)
  }

  pub(crate) fn api_url(&self, path: &str) -> String {
    format!("{}/{}", self.api_base, path.trim_start_matches('/'))
  }

  /// Resolve a `_links.next` value. Confluence returns it relative to the
  /// base URL, not the API root.
  pub(crate) fn next_url(&self, next: &str) -> String {
    if next.starts_with("http://") || next.starts_with("https://") {
      return next.to_string();
    }
    format!("{}{}", self.base_url, next)
  }

  /// Issue one GET and decode the JSON body.
  pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &Params) -> Result<T> {
    let http = self.http_client()?;
    debug!(%url, ?params, session = self.is_session(), "GET");

    let mut request = http
      .get(url)
      .header(AUTHORIZATION, self.auth_header())
      .header(ACCEPT, "application/json");
    if !params.is_empty() {
      request = request.query(params);
    }

    let response = request.send().await?;
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
      let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      return Err(ConfluenceError::Status { status, url, body });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| ConfluenceError::Decode { url, source })
  }

  /// The session's pooled client, or a throwaway one in ad-hoc mode.
  fn http_client(&self) -> Result<Cow<'_, reqwest::Client>> {
    match &self.http {
      Some(http) => Ok(Cow::Borrowed(http)),
      None => self.build_http_client().map(Cow::Owned),
    }
  }

  fn build_http_client(&self) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(format!(
      "confluence-query/{} ({})",
      env!("CARGO_PKG_VERSION"),
      env!("TARGET")
    ));
    if let Some(timeout) = self.timeout {
      builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
  }

  /// Get the authorization header value (Basic auth).
  fn auth_header(&self) -> String {
    let credentials = format!("{}:{}", self.username, self.password);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
  }
}

impl fmt::Display for Confluence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.api_base)
  }
}

impl fmt::Debug for Confluence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Confluence")
      .field("api_base", &self.api_base)
      .field("username", &self.username)
      .field("timeout", &self.timeout)
      .field("session", &self.is_session())
      .finish_non_exhaustive()
  }
}

/// A scoped connection to Confluence.
///
/// Dereferences to [`Confluence`], so every query available on the client is
/// available on the session. The connection pool is released on
/// [`Session::close`] or when the guard goes out of scope, including early
/// returns through `?`.
#[derive(Debug)]
pub struct Session {
  inner: Confluence,
}

impl Session {
  /// Close the session and release its connections.
  pub fn close(self) {}
}

impl Deref for Session {
  type Target = Confluence;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

impl Drop for Session {
  fn drop(&mut self) {
    if self.inner.http.take().is_some() {
      trace!("Closed Confluence session for {}", self.inner.api_base);
    }
  }
}
