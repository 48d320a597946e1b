//! `.netrc` credential discovery.
//!
//! Keeps Confluence passwords out of shell history and supports several
//! hosts in one file.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Credential, CredentialError, CredentialsProvider};

/// A credentials provider that reads a `.netrc` file.
///
/// By default the file is `$HOME/.netrc`; [`NetrcProvider::with_path`] reads
/// another location instead.
#[derive(Debug, Default)]
pub struct NetrcProvider {
  path: Option<PathBuf>,
}

impl NetrcProvider {
  /// Provider for `$HOME/.netrc`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Provider for an explicit file.
  pub fn with_path(path: impl Into<PathBuf>) -> Self {
    Self {
      path: Some(path.into()),
    }
  }

  fn resolve_path(&self) -> Result<PathBuf, CredentialError> {
    if let Some(path) = &self.path {
      return Ok(path.clone());
    }
    let home = std::env::var("HOME").map_err(|_| CredentialError::HomeNotFound)?;
    Ok(Path::new(&home).join(".netrc"))
  }
}

impl CredentialsProvider for NetrcProvider {
  /// Resolve credentials for `host`.
  ///
  /// A missing file is not an error; it yields `Ok(None)`.
  fn get_credentials(&self, host: &str) -> Result<Option<Credential>, CredentialError> {
    let path = self.resolve_path()?;
    if !path.exists() {
      debug!("No .netrc at {}", path.display());
      return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    parse_netrc(&content, host)
  }
}

#[derive(Default)]
struct Entry {
  login: Option<String>,
  password: Option<String>,
}

impl Entry {
  fn into_credential(self) -> Option<Credential> {
    match (self.login, self.password) {
      (Some(login), Some(password)) => Some(Credential::new(login, password)),
      _ => None,
    }
  }
}

enum Machine {
  Named(String),
  Default,
}

/// Split a `.netrc` into whitespace separated tokens, skipping comments and
/// `macdef` bodies (which run until the next blank line).
fn tokenize(content: &str) -> Vec<&str> {
  let mut tokens = Vec::new();
  let mut in_macdef = false;

  for line in content.lines() {
    let trimmed = line.trim();
    if in_macdef {
      if trimmed.is_empty() {
        in_macdef = false;
      }
      continue;
    }
    if trimmed.starts_with('#') {
      continue;
    }

    let mut words = trimmed.split_whitespace();
    while let Some(word) = words.next() {
      if word == "macdef" {
        // Macro name is on this line; the body follows.
        words.next();
        in_macdef = true;
        break;
      }
      tokens.push(word);
    }
  }

  tokens
}

/// Extract the credentials for `target_host`.
///
/// An exact `machine` match wins over a `default` entry regardless of their
/// order in the file. Entries lacking a login or password are ignored.
fn parse_netrc(content: &str, target_host: &str) -> Result<Option<Credential>, CredentialError> {
  let mut tokens = tokenize(content).into_iter();
  let mut current: Option<(Machine, Entry)> = None;
  let mut fallback: Option<Credential> = None;

  // Returns the credential when the finished entry is an exact match.
  let mut finish = |entry: Option<(Machine, Entry)>| -> Option<Credential> {
    match entry {
      Some((Machine::Named(name), entry)) if name == target_host => entry.into_credential(),
      Some((Machine::Default, entry)) => {
        if fallback.is_none() {
          fallback = entry.into_credential();
        }
        None
      }
      _ => None,
    }
  };

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        let name = tokens
          .next()
          .ok_or_else(|| CredentialError::Parse("`machine` without a host name".to_string()))?;
        if let Some(found) = finish(current.take()) {
          return Ok(Some(found));
        }
        current = Some((Machine::Named(name.to_string()), Entry::default()));
      }
      "default" => {
        if let Some(found) = finish(current.take()) {
          return Ok(Some(found));
        }
        current = Some((Machine::Default, Entry::default()));
      }
      "login" | "password" | "account" => {
        let value = tokens.next().map(str::to_string);
        if let Some((_, entry)) = current.as_mut() {
          match token {
            "login" => entry.login = value,
            "password" => entry.password = value,
            _ => {}
          }
        }
      }
      _ => {}
    }
  }

  if let Some(found) = finish(current.take()) {
    return Ok(Some(found));
  }

  Ok(fallback)
}
