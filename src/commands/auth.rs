//! Authentication subcommand handlers.
//!
//! `confluence-query auth test` performs a live `user/current` lookup, while
//! `confluence-query auth show` prints where each credential came from.

use std::process;

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::confluence::{Confluence, ConfluenceApi};
use crate::credentials::{Credential, CredentialsProvider, NetrcProvider};

/// Authentication subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum AuthCommand {
  /// Verify the credentials against the `user/current` endpoint
  Test,
  /// Show which credential sources were detected
  Show,
}

/// Dispatch the subcommands defined under `confluence-query auth`.
pub(crate) async fn handle_auth_command(subcommand: &AuthCommand, cli: &Cli, colors: &ColorScheme) {
  match subcommand {
    AuthCommand::Test => {
      let Some(base_url) = cli.auth.url.as_deref() else {
        eprintln!("{} {}", colors.error("✗"), colors.error("Base URL not provided"));
        eprintln!("\n{}", colors.info("Please provide the Confluence URL:"));
        eprintln!("  confluence-query --url https://wiki.example.com auth test");
        eprintln!("  Or set CONFLUENCE_URL environment variable");
        process::exit(1);
      };

      println!("{} {}", colors.info("→"), colors.info("Testing authentication"));
      println!("  {}: {}", colors.emphasis("URL"), colors.link(base_url));

      let credential = match load_credentials(base_url, cli) {
        Ok(credential) => credential,
        Err(e) => {
          eprintln!("\n{} {}", colors.error("✗"), colors.error("Failed to load credentials"));
          eprintln!("  {e}");
          eprintln!("\n{}", colors.info("Provide credentials via:"));
          eprintln!("  • CLI flags: --user and --password");
          eprintln!("  • Environment variables: CONFLUENCE_USER and CONFLUENCE_PASSWORD");
          eprintln!("  • ~/.netrc file");
          process::exit(2);
        }
      };

      println!("  {}: {}", colors.emphasis("Username"), credential.username);

      if let Err(e) = test_auth(base_url, &credential, cli, colors).await {
        eprintln!("\n{} {}", colors.error("✗"), colors.error("Authentication failed"));
        eprintln!("  {e:#}");
        eprintln!("\n{}", colors.info("Common issues:"));
        eprintln!("  1. Wrong password or expired personal access token");
        eprintln!("  2. Wrong base URL - include the context path, e.g. https://host/confluence");
        eprintln!("  3. Network connectivity issues");
        eprintln!(
          "\n{}",
          colors.dimmed("Run 'confluence-query auth show' to see your current configuration")
        );
        process::exit(2);
      }
    }
    AuthCommand::Show => {
      show_auth_config(cli, colors);
    }
  }
}

async fn test_auth(base_url: &str, credential: &Credential, cli: &Cli, colors: &ColorScheme) -> Result<()> {
  let client = Confluence::new(base_url, &credential.username, &credential.password)
    .with_timeout(std::time::Duration::from_secs(cli.connection.timeout));

  println!("\n{} {}", colors.info("→"), colors.info("Calling Confluence API..."));
  let user = client
    .get_current_user()
    .await
    .context("Request to user/current failed")?;

  if user.user_type == "anonymous" {
    return Err(anyhow!("the server treated the request as anonymous"));
  }

  println!(
    "\n{} {}",
    colors.success("✓"),
    colors.success("Authentication successful!")
  );
  println!("\n{}", colors.emphasis("User Information:"));
  if let Some(display_name) = &user.display_name {
    println!("  {}: {}", colors.emphasis("Display Name"), display_name);
  }
  if let Some(username) = &user.username {
    println!("  {}: {}", colors.emphasis("Username"), username);
  }
  if let Some(user_key) = &user.user_key {
    println!("  {}: {}", colors.emphasis("User Key"), colors.dimmed(user_key));
  }
  if let Some(account_id) = &user.account_id {
    println!("  {}: {}", colors.emphasis("Account ID"), colors.dimmed(account_id));
  }
  println!("\n{} Your credentials are working correctly.", colors.info("ℹ"));

  Ok(())
}

/// Display the currently configured authentication sources and values.
fn show_auth_config(cli: &Cli, colors: &ColorScheme) {
  println!("{}\n", colors.emphasis("Authentication Configuration"));

  let url = cli.auth.url.as_deref();
  match url {
    Some(url_value) => {
      println!("{}: {}", colors.emphasis("Base URL"), colors.link(url_value));
      println!(
        "  {}: {}",
        colors.dimmed("Source"),
        colors.dimmed(source_label("CONFLUENCE_URL"))
      );
    }
    None => println!("{}: {}", colors.emphasis("Base URL"), colors.dimmed("(not set)")),
  }

  let username = cli.auth.user.as_deref();
  let password = cli.auth.password.as_deref();

  let netrc_creds = if username.is_none() || password.is_none() {
    url
      .and_then(extract_host)
      .and_then(|host| NetrcProvider::new().get_credentials(&host).ok().flatten())
  } else {
    None
  };

  if let Some(user_value) = username {
    println!("\n{}: {}", colors.emphasis("Username"), user_value);
    println!(
      "  {}: {}",
      colors.dimmed("Source"),
      colors.dimmed(source_label("CONFLUENCE_USER"))
    );
  } else if let Some(creds) = &netrc_creds {
    println!("\n{}: {}", colors.emphasis("Username"), creds.username);
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(".netrc file"));
  } else {
    println!("\n{}: {}", colors.emphasis("Username"), colors.dimmed("(not set)"));
  }

  if let Some(password_value) = password {
    println!("\n{}: {}", colors.emphasis("Password"), colors.dimmed(mask(password_value)));
    println!(
      "  {}: {}",
      colors.dimmed("Source"),
      colors.dimmed(source_label("CONFLUENCE_PASSWORD"))
    );
  } else if netrc_creds.is_some() {
    println!("\n{}: {}", colors.emphasis("Password"), colors.dimmed("********"));
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(".netrc file"));
  } else {
    println!("\n{}: {}", colors.emphasis("Password"), colors.dimmed("(not set)"));
  }

  if url.is_none() {
    println!(
      "\n{} {} is required for API access",
      colors.warning("⚠"),
      colors.emphasis("Base URL")
    );
    println!("  Set via --url flag or CONFLUENCE_URL environment variable");
  }

  let complete = (username.is_some() || netrc_creds.is_some()) && (password.is_some() || netrc_creds.is_some());
  if complete {
    println!("\n{} {}", colors.success("✓"), colors.success("Credentials configured"));
    return;
  }

  println!(
    "\n{} {} for API access",
    colors.warning("⚠"),
    colors.warning("Credentials incomplete")
  );
  println!("\n  Add credentials to ~/.netrc:");
  if let Some(host) = url.and_then(extract_host) {
    println!("    machine {host}");
  }
  println!("      login your-username");
  println!("      password your-password");
}

fn source_label(env_var: &str) -> &'static str {
  if std::env::var(env_var).is_ok() {
    "environment variable"
  } else {
    "command-line flag"
  }
}

fn mask(secret: &str) -> String {
  let chars: Vec<char> = secret.chars().collect();
  if chars.len() > 8 {
    let visible: String = chars[..4].iter().collect();
    format!("{visible}{}", "*".repeat(chars.len() - 4))
  } else {
    "*".repeat(chars.len())
  }
}

/// Resolve credentials from CLI flags, environment variables, or `.netrc`.
///
/// Explicit flags and environment variables win; `.netrc` fills in whatever
/// is missing.
///
/// # Errors
/// Returns an error when the base URL has no host, when `.netrc` cannot be
/// read, or when no source provides both a username and a password.
pub(crate) fn load_credentials(base_url: &str, cli: &Cli) -> Result<Credential> {
  if let (Some(user), Some(password)) = (&cli.auth.user, &cli.auth.password) {
    return Ok(Credential::new(user, password));
  }

  let host = extract_host(base_url).ok_or_else(|| anyhow!("Invalid base URL: {base_url}"))?;

  if let Some(creds) = NetrcProvider::new().get_credentials(&host)? {
    let user = cli.auth.user.clone().unwrap_or(creds.username);
    let password = cli.auth.password.clone().unwrap_or(creds.password);
    return Ok(Credential::new(user, password));
  }

  anyhow::bail!(
    "Credentials not found. Provide --user and --password, set CONFLUENCE_USER and CONFLUENCE_PASSWORD, or add to ~/.netrc"
  )
}

/// Host component of a base URL, used as the `.netrc` machine name.
fn extract_host(url: &str) -> Option<String> {
  let parsed = url::Url::parse(url)
    .or_else(|_| url::Url::parse(&format!("https://{url}")))
    .ok()?;
  parsed.host_str().map(str::to_string)
}
