//! Command-line interface definitions for confluence-query.
//!
//! This module defines the CLI structure using clap derives and dispatches
//! the parsed command to its handler.

use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands::auth::{AuthCommand, handle_auth_command};
use crate::commands::completions::{Shell, handle_completions_command};
use crate::commands::query::handle_query_command;
use crate::commands::version::handle_version_command;
use crate::confluence::{ContentType, SpaceStatus, SpaceType};
use crate::format::OutputFormat;

/// confluence-query - Query the Confluence REST API from the terminal
#[derive(Debug, Parser)]
#[command(
  name = "confluence-query",
  version,
  about = "Query Confluence content, spaces, users, groups and tasks",
  long_about = "A read-only command-line client for the Confluence REST API.\n\
                Results are streamed page by page as they are fetched.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Authentication options
  #[command(flatten)]
  pub auth: AuthOptions,

  /// Output options
  #[command(flatten)]
  pub output: OutputOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,

  /// Connection options
  #[command(flatten)]
  pub connection: ConnectionOptions,
}

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  #[command(flatten)]
  Query(QueryCommand),

  /// Authentication testing and inspection
  Auth {
    #[command(subcommand)]
    subcommand: AuthCommand,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Subcommands that talk to the Confluence API
#[derive(Debug, Clone, Subcommand)]
pub enum QueryCommand {
  /// List pages or blog posts
  Content {
    /// Content type to return
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    content_type: Option<ContentType>,

    /// Only content in this space
    #[arg(long = "space", value_name = "KEY")]
    space_key: Option<String>,

    /// Exact title to match
    #[arg(long)]
    title: Option<String>,

    /// Only content in this status (e.g. current, draft, trashed)
    #[arg(long)]
    status: Option<String>,

    /// Blog posts published on this day (YYYY-MM-DD); ignored for pages
    #[arg(long, value_name = "DATE", value_parser = parse_day)]
    posting_day: Option<NaiveDate>,

    #[command(flatten)]
    expand: ExpandOptions,
  },

  /// Search content with CQL
  Search {
    /// CQL query, e.g. "type=page and space=DOCS"
    #[arg(value_name = "CQL")]
    cql: String,

    /// JSON-serialised search context
    #[arg(long, value_name = "JSON")]
    cql_context: Option<String>,

    #[command(flatten)]
    expand: ExpandOptions,
  },

  /// List spaces
  Spaces {
    /// Only these space keys (repeat or comma-separate)
    #[arg(long = "key", value_name = "KEY", value_delimiter = ',')]
    keys: Vec<String>,

    /// Space type filter
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    space_type: Option<SpaceType>,

    /// Space status filter
    #[arg(long, value_enum)]
    status: Option<SpaceStatus>,

    /// Only spaces with this label
    #[arg(long)]
    label: Option<String>,

    /// Only spaces favourited by the current user (server support unverified)
    #[arg(long)]
    favourite: bool,

    #[command(flatten)]
    expand: ExpandOptions,
  },

  /// Show a single space
  Space {
    /// Space key
    #[arg(value_name = "KEY")]
    key: String,

    #[command(flatten)]
    expand: ExpandOptions,
  },

  /// List the content of a space
  SpaceContent {
    /// Space key
    #[arg(value_name = "KEY")]
    key: String,

    /// Restrict to one content type
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    content_type: Option<ContentType>,

    /// Only top-level content
    #[arg(long)]
    root_only: bool,

    #[command(flatten)]
    expand: ExpandOptions,
  },

  /// User lookups
  User {
    #[command(subcommand)]
    subcommand: UserCommand,
  },

  /// Group lookups
  Group {
    #[command(subcommand)]
    subcommand: GroupCommand,
  },

  /// Long-running task status
  Task {
    #[command(subcommand)]
    subcommand: TaskCommand,
  },
}

/// User subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum UserCommand {
  /// Show a user by username or user key (exactly one)
  Get {
    #[command(flatten)]
    who: UserSelector,

    #[command(flatten)]
    expand: ExpandOptions,
  },
  /// Show the authenticated user
  Current,
  /// Show the anonymous user
  Anonymous,
  /// List the groups a user belongs to
  Groups {
    #[command(flatten)]
    who: UserSelector,

    #[command(flatten)]
    expand: ExpandOptions,
  },
}

/// Identifies a user. Exactly one field must be given; this is checked when
/// the lookup is built so the same rule applies to library callers.
#[derive(Debug, Clone, Parser)]
pub struct UserSelector {
  /// Username as shown in Confluence
  #[arg(long)]
  pub username: Option<String>,

  /// Opaque user key
  #[arg(long = "key", value_name = "USER_KEY")]
  pub user_key: Option<String>,
}

/// Group subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum GroupCommand {
  /// List every group
  List {
    #[command(flatten)]
    expand: ExpandOptions,
  },
  /// Show a single group
  Get {
    #[arg(value_name = "NAME")]
    name: String,

    #[command(flatten)]
    expand: ExpandOptions,
  },
  /// List the members of a group
  Members {
    #[arg(value_name = "NAME")]
    name: String,

    #[command(flatten)]
    expand: ExpandOptions,
  },
}

/// Long task subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum TaskCommand {
  /// List running and recently finished tasks
  List {
    #[command(flatten)]
    expand: ExpandOptions,
  },
  /// Show a single task
  Get {
    /// Task id (GUID)
    #[arg(value_name = "TASK_ID")]
    id: String,

    #[command(flatten)]
    expand: ExpandOptions,
  },
}

/// Field expansion shared by every query
#[derive(Debug, Clone, Default, Parser)]
pub struct ExpandOptions {
  /// Fields to expand (repeat or comma-separate), e.g. body.storage,space
  #[arg(long, value_name = "FIELD", value_delimiter = ',')]
  pub expand: Vec<String>,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Normalize a URL by adding https:// if no scheme is present
fn normalize_url(url: &str) -> Result<String, String> {
  let trimmed = url.trim();

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) => parsed,
    Err(_) => {
      let with_https = format!("https://{trimmed}");
      Url::parse(&with_https).map_err(|e| format!("Invalid URL: {e}"))?
    }
  };

  let mut url_str = parsed.to_string();
  if url_str.ends_with('/') && url_str.len() > 1 {
    url_str.pop();
  }

  Ok(url_str)
}

/// Authentication options
#[derive(Debug, Parser)]
pub struct AuthOptions {
  /// Confluence base URL (including any context path, e.g. /confluence)
  #[arg(long, env = "CONFLUENCE_URL", value_name = "URL", value_parser = normalize_url)]
  pub url: Option<String>,

  /// Confluence username
  #[arg(long, env = "CONFLUENCE_USER", value_name = "USER")]
  pub user: Option<String>,

  /// Confluence password or personal access token
  #[arg(
    long,
    alias = "token",
    env = "CONFLUENCE_PASSWORD",
    value_name = "PASSWORD",
    hide_env_values = true
  )]
  pub password: Option<String>,
}

/// Output options
#[derive(Debug, Parser)]
pub struct OutputOptions {
  /// Output format
  #[arg(long, value_enum, default_value = "text", value_name = "FORMAT")]
  pub format: OutputFormat,

  /// Stop after this many items (remaining pages are not requested)
  #[arg(long, value_name = "N")]
  pub limit: Option<usize>,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Connection options
#[derive(Debug, Parser)]
pub struct ConnectionOptions {
  /// Request timeout in seconds
  #[arg(long, default_value = "30", value_name = "SECONDS")]
  pub timeout: u64,

  /// Open a new connection for every request instead of reusing a session
  #[arg(long)]
  pub no_session: bool,
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if matches!(self.command, Command::Query(_)) && self.auth.url.is_none() {
      return Err("--url (or CONFLUENCE_URL) is required for queries".to_string());
    }

    if self.output.limit == Some(0) {
      return Err("--limit must be at least 1".to_string());
    }

    if self.connection.timeout == 0 {
      return Err("--timeout must be at least 1 second".to_string());
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Query(query) => {
      handle_query_command(query, &cli, &colors).await;
    }
    Command::Auth { subcommand } => {
      handle_auth_command(subcommand, &cli, &colors).await;
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
