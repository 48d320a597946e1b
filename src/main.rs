//! confluence-query - Query the Confluence REST API from the terminal
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  confluence_query::cli::run().await;
}
