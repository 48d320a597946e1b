//! Handlers for the subcommands that query the Confluence API.
//!
//! Collection results are printed as they stream in, so the first lines
//! appear before later pages have been requested.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{Cli, GroupCommand, QueryCommand, TaskCommand, UserCommand, UserSelector};
use crate::color::ColorScheme;
use crate::commands::auth::load_credentials;
use crate::confluence::{Confluence, ConfluenceApi, ConfluenceError, ContentQuery, SearchQuery, SpaceQuery, UserLookup};
use crate::format::{OutputFormat, render, render_stream};

/// Run a query subcommand and print its results, exiting on failure.
///
/// Exit codes: `1` for failed requests, `2` for missing credentials and `4`
/// for arguments the query builders reject.
pub(crate) async fn handle_query_command(query: &QueryCommand, cli: &Cli, colors: &ColorScheme) {
  let Some(base_url) = cli.auth.url.as_deref() else {
    eprintln!("{} --url (or CONFLUENCE_URL) is required", colors.error("Error:"));
    process::exit(4);
  };

  let credential = match load_credentials(base_url, cli) {
    Ok(credential) => credential,
    Err(e) => {
      eprintln!("{} {e:#}", colors.error("Error:"));
      process::exit(2);
    }
  };

  let client = Confluence::new(base_url, &credential.username, &credential.password)
    .with_timeout(Duration::from_secs(cli.connection.timeout));

  match run_query(&client, query, cli, colors).await {
    Ok(count) => info!("{count} result(s)"),
    Err(e) => {
      eprintln!("{} {e:#}", colors.error("Error:"));
      let invalid = e
        .downcast_ref::<ConfluenceError>()
        .is_some_and(ConfluenceError::is_invalid_argument);
      process::exit(if invalid { 4 } else { 1 });
    }
  }
}

async fn run_query(client: &Confluence, query: &QueryCommand, cli: &Cli, colors: &ColorScheme) -> Result<usize> {
  let format = cli.output.format;
  let limit = cli.output.limit;
  let mut emit = |line: String| println!("{line}");

  if cli.connection.no_session {
    debug!("Running without a session against {client}");
    return execute(client, query, format, limit, colors, &mut emit).await;
  }

  let session = client.session().context("Failed to open a session")?;
  let count = execute(&*session, query, format, limit, colors, &mut emit).await?;
  session.close();
  Ok(count)
}

/// Translate a parsed subcommand into API calls and render the results.
///
/// # Arguments
/// * `api` - Client, session or fake to query.
/// * `command` - The parsed query subcommand.
/// * `format` - Output format for each item.
/// * `limit` - Stop after this many items; later pages are never requested.
/// * `colors` - Color scheme for text output.
/// * `emit` - Receives one rendered line per item.
///
/// # Returns
/// The number of items rendered.
///
/// # Errors
/// Returns the [`ConfluenceError`] raised by argument validation or by a
/// request, wrapped with the failing operation.
pub async fn execute(
  api: &dyn ConfluenceApi,
  command: &QueryCommand,
  format: OutputFormat,
  limit: Option<usize>,
  colors: &ColorScheme,
  emit: &mut dyn FnMut(String),
) -> Result<usize> {
  match command {
    QueryCommand::Content {
      content_type,
      space_key,
      title,
      status,
      posting_day,
      expand,
    } => {
      let query = ContentQuery {
        content_type: *content_type,
        space_key: space_key.clone(),
        title: title.clone(),
        status: status.clone(),
        posting_day: *posting_day,
        expand: expand.expand.clone(),
      };
      render_stream(api.get_content(&query), format, limit, colors, emit).await
    }
    QueryCommand::Search {
      cql,
      cql_context,
      expand,
    } => {
      let mut query = SearchQuery::new(cql.as_str())?.expand(&expand.expand);
      if let Some(context) = cql_context {
        query = query.cql_context(context.as_str());
      }
      render_stream(api.search(&query), format, limit, colors, emit).await
    }
    QueryCommand::Spaces {
      keys,
      space_type,
      status,
      label,
      favourite,
      expand,
    } => {
      let mut query = SpaceQuery::new()
        .space_keys(keys)
        .favourite(*favourite)
        .expand(&expand.expand);
      if let Some(space_type) = space_type {
        query = query.space_type(*space_type);
      }
      if let Some(status) = status {
        query = query.status(*status);
      }
      if let Some(label) = label {
        query = query.label(label.as_str());
      }
      render_stream(api.get_spaces(&query), format, limit, colors, emit).await
    }
    QueryCommand::Space { key, expand } => {
      let space = api
        .get_space(key, &expand.expand)
        .await
        .with_context(|| format!("Failed to fetch space {key}"))?;
      emit_one(&space, format, colors, emit)
    }
    QueryCommand::SpaceContent {
      key,
      content_type,
      root_only,
      expand,
    } => {
      let items = match content_type {
        Some(content_type) => api.get_space_content_with_type(key, *content_type, *root_only, &expand.expand),
        None => api.get_space_content(key, *root_only, &expand.expand),
      };
      render_stream(items, format, limit, colors, emit).await
    }
    QueryCommand::User { subcommand } => match subcommand {
      UserCommand::Get { who, expand } => {
        let lookup = user_lookup(who)?;
        let user = api.get_user(&lookup, &expand.expand).await.context("Failed to fetch user")?;
        emit_one(&user, format, colors, emit)
      }
      UserCommand::Current => {
        let user = api.get_current_user().await.context("Failed to fetch current user")?;
        emit_one(&user, format, colors, emit)
      }
      UserCommand::Anonymous => {
        let user = api
          .get_anonymous_user()
          .await
          .context("Failed to fetch anonymous user")?;
        emit_one(&user, format, colors, emit)
      }
      UserCommand::Groups { who, expand } => {
        let lookup = user_lookup(who)?;
        render_stream(api.get_user_groups(&lookup, &expand.expand), format, limit, colors, emit).await
      }
    },
    QueryCommand::Group { subcommand } => match subcommand {
      GroupCommand::List { expand } => render_stream(api.get_groups(&expand.expand), format, limit, colors, emit).await,
      GroupCommand::Get { name, expand } => {
        let group = api
          .get_group(name, &expand.expand)
          .await
          .with_context(|| format!("Failed to fetch group {name}"))?;
        emit_one(&group, format, colors, emit)
      }
      GroupCommand::Members { name, expand } => {
        render_stream(api.get_group_members(name, &expand.expand), format, limit, colors, emit).await
      }
    },
    QueryCommand::Task { subcommand } => match subcommand {
      TaskCommand::List { expand } => {
        render_stream(api.get_long_tasks(&expand.expand), format, limit, colors, emit).await
      }
      TaskCommand::Get { id, expand } => {
        let task = api
          .get_long_task(id, &expand.expand)
          .await
          .with_context(|| format!("Failed to fetch task {id}"))?;
        emit_one(&task, format, colors, emit)
      }
    },
  }
}

fn user_lookup(who: &UserSelector) -> Result<UserLookup> {
  Ok(UserLookup::new(who.username.clone(), who.user_key.clone())?)
}

fn emit_one<T>(item: &T, format: OutputFormat, colors: &ColorScheme, emit: &mut dyn FnMut(String)) -> Result<usize>
where
  T: crate::format::Summary + serde::Serialize,
{
  emit(render(item, format, colors)?);
  Ok(1)
}
