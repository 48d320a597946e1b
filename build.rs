//! Build script for confluence-query
//!
//! Exposes build metadata to the crate as compile-time environment variables.
//! `version` prints all of them and the HTTP user agent includes `TARGET`.
//! Every variable is always set so `env!` never fails, even outside a git
//! checkout or without `rustc` on the PATH.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const UNKNOWN: &str = "unknown";

fn main() {
  let git_hash = command_stdout("git", &["rev-parse", "--short", "HEAD"]);
  let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
  let rustc_version = command_stdout(&rustc, &["--version"]);
  let built_at = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_secs().to_string())
    .ok();

  emit("GIT_HASH", git_hash.as_deref());
  emit("BUILD_TIMESTAMP", built_at.as_deref());
  emit("TARGET", env::var("TARGET").ok().as_deref());
  emit("RUSTC_VERSION", rustc_version.as_deref());

  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
  println!("cargo:rerun-if-env-changed=TARGET");
}

/// Trimmed stdout of a successful command; `None` if it could not run,
/// failed, or printed nothing.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
  let output = Command::new(program).args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let text = String::from_utf8(output.stdout).ok()?;
  let text = text.trim();
  (!text.is_empty()).then(|| text.to_string())
}

fn emit(key: &str, value: Option<&str>) {
  println!("cargo:rustc-env={key}={}", value.unwrap_or(UNKNOWN));
}
