//! Lazy pagination over Confluence collection endpoints.

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::Confluence;
use super::error::{ConfluenceError, Result};
use super::models::ResultPage;
use super::query::{ApiRequest, Params};

/// Lazy, finite stream of hydrated items from a paginated endpoint.
///
/// The first request is sent on the first poll. Each page is fully yielded
/// before the request for the following page is issued, and that request
/// goes to the server-provided `_links.next` URL with no locally held
/// parameters. The stream ends after a page without a `next` link.
///
/// A failure ends the stream after yielding the error. Dropping the stream
/// stops further requests; a new call restarts from the first page.
pub type Pager<'a, T> = BoxStream<'a, Result<T>>;

/// Convert one decoded JSON object into a domain model.
pub fn hydrate<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, serde_json::Error> {
  serde_json::from_value(value)
}

struct PagerState<'a> {
  client: &'a Confluence,
  /// Request for the next page; `None` once the last page was fetched.
  next: Option<(String, Params)>,
  /// URL of the page currently being drained.
  current_url: String,
  buffer: VecDeque<serde_json::Value>,
  page: usize,
}

pub(crate) fn paginate<'a, T>(client: &'a Confluence, request: &ApiRequest) -> Pager<'a, T>
where
  T: DeserializeOwned + Send + 'a,
{
  let url = client.api_url(&request.path);
  let state = PagerState {
    client,
    next: Some((url.clone(), request.query_params())),
    current_url: url,
    buffer: VecDeque::new(),
    page: 0,
  };

  stream::try_unfold(state, next_item::<T>).boxed()
}

async fn next_item<'a, T: DeserializeOwned>(mut state: PagerState<'a>) -> Result<Option<(T, PagerState<'a>)>> {
  loop {
    if let Some(raw) = state.buffer.pop_front() {
      let item = hydrate(raw).map_err(|source| ConfluenceError::Decode {
        url: state.current_url.clone(),
        source,
      })?;
      return Ok(Some((item, state)));
    }

    let Some((url, params)) = state.next.take() else {
      return Ok(None);
    };

    state.page += 1;
    debug!(page = state.page, %url, "Fetching result page");

    let page: ResultPage = state.client.get_json(&url, &params).await?;
    debug!(
      page = state.page,
      items = page.results.len(),
      has_next = page.links.next.is_some(),
      "Fetched result page"
    );

    state.next = page
      .links
      .next
      .map(|next| (state.client.next_url(&next), Params::new()));
    state.current_url = url;
    state.buffer = page.results.into();
  }
}
