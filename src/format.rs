//! Output formats and rendering of query results.

use anyhow::{Context, Result};
use clap::ValueEnum;
use futures::StreamExt;
use serde::Serialize;

use crate::color::ColorScheme;
use crate::confluence::{Group, LongTask, Page, Pager, Space, User};

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
  /// One human-readable line per item (default)
  #[default]
  Text,
  /// One JSON document per line
  #[value(alias = "jsonl")]
  Json,
}

/// One-line, human-readable description of a result.
pub trait Summary {
  fn summary(&self, colors: &ColorScheme) -> String;
}

impl Summary for Page {
  fn summary(&self, colors: &ColorScheme) -> String {
    let mut line = format!(
      "{}  {}  {}",
      colors.number(&self.id),
      colors.dimmed(format!("{:<8} {:<8}", self.content_type, self.status)),
      colors.emphasis(&self.title)
    );
    if let Some(space) = &self.space {
      line.push_str(&format!("  {}", colors.dimmed(format!("[{}]", space.key))));
    }
    line
  }
}

impl Summary for Space {
  fn summary(&self, colors: &ColorScheme) -> String {
    let mut line = format!(
      "{}  {}  {}",
      colors.code(&self.key),
      colors.dimmed(format!("{:<8}", self.space_type)),
      colors.emphasis(&self.name)
    );
    if let Some(status) = &self.status {
      line.push_str(&format!("  {}", colors.dimmed(format!("({status})"))));
    }
    let labels = self.labels();
    if !labels.is_empty() {
      line.push_str(&format!("  {}", colors.dimmed(format!("labels: {}", labels.join(", ")))));
    }
    line
  }
}

impl Summary for User {
  fn summary(&self, colors: &ColorScheme) -> String {
    let mut line = colors.code(self.identifier());
    if let Some(display_name) = &self.display_name {
      line.push_str(&format!("  {}", colors.emphasis(display_name)));
    }
    if let (Some(key), Some(_)) = (&self.user_key, &self.username) {
      line.push_str(&format!("  {}", colors.dimmed(format!("key {key}"))));
    }
    line
  }
}

impl Summary for Group {
  fn summary(&self, colors: &ColorScheme) -> String {
    colors.code(&self.name)
  }
}

impl Summary for LongTask {
  fn summary(&self, colors: &ColorScheme) -> String {
    let progress = self
      .percentage_complete
      .map(|pct| format!("{pct:>3}%"))
      .unwrap_or_else(|| "   ?".to_string());
    let state = match (self.finished, self.successful) {
      (Some(true), Some(false)) => colors.error("failed"),
      (Some(true), _) => colors.success("finished"),
      _ => colors.warning("running"),
    };

    format!(
      "{}  {}  {}  {}",
      colors.number(&self.id),
      colors.number(progress),
      state,
      colors.emphasis(self.display_name())
    )
  }
}

/// Render one item in the requested format.
pub fn render<T: Summary + Serialize>(item: &T, format: OutputFormat, colors: &ColorScheme) -> Result<String> {
  match format {
    OutputFormat::Text => Ok(item.summary(colors)),
    OutputFormat::Json => serde_json::to_string(item).context("Failed to serialize result as JSON"),
  }
}

/// Drain a result stream, handing each rendered item to `emit` as soon as it
/// arrives.
///
/// With a `limit`, the stream is dropped after that many items and no
/// further pages are requested.
///
/// # Returns
/// The number of items emitted.
///
/// # Errors
/// Returns the first error produced by the stream; items emitted before it
/// have already been handed to `emit`.
pub async fn render_stream<T>(
  items: Pager<'_, T>,
  format: OutputFormat,
  limit: Option<usize>,
  colors: &ColorScheme,
  emit: &mut dyn FnMut(String),
) -> Result<usize>
where
  T: Summary + Serialize,
{
  let mut items = match limit {
    Some(limit) => items.take(limit).boxed(),
    None => items,
  };

  let mut count = 0;
  while let Some(item) = items.next().await {
    let item = item.with_context(|| format!("Failed after {count} results"))?;
    emit(render(&item, format, colors)?);
    count += 1;
  }

  Ok(count)
}
