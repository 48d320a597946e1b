//! Query builders translating typed filters into REST requests.
//!
//! Every function here is pure: it validates its arguments and produces an
//! [`ApiRequest`] describing the resource path, query parameters and
//! expansions. Sending the request is the job of
//! [`Confluence`](super::Confluence).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::{ConfluenceError, Result};
use super::models::{ContentType, SpaceStatus, SpaceType};

/// Query parameters in a deterministic order.
pub type Params = BTreeMap<String, String>;

/// A fully assembled GET request relative to the API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
  /// Resource path below `{base_url}/rest/api`, without a leading slash.
  pub path: String,
  /// Filter parameters.
  pub params: Params,
  /// Fields to expand; sent as one comma-joined `expand` parameter.
  pub expand: Vec<String>,
}

impl ApiRequest {
  /// Create a request for `path` with no parameters.
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      params: Params::new(),
      expand: Vec::new(),
    }
  }

  /// Set a parameter; `None` and empty values are skipped.
  pub fn param<V: Into<String>>(mut self, key: &str, value: Option<V>) -> Self {
    if let Some(value) = value.map(Into::into).filter(|value| !value.is_empty()) {
      self.params.insert(key.to_string(), value);
    }
    self
  }

  /// Attach the fields to expand.
  pub fn expand<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
    self.expand = fields
      .iter()
      .map(|field| field.as_ref().trim().to_string())
      .filter(|field| !field.is_empty())
      .collect();
    self
  }

  /// Parameters that go on the wire, with `expand` merged in when present.
  pub fn query_params(&self) -> Params {
    let mut params = self.params.clone();
    if !self.expand.is_empty() {
      params.insert("expand".to_string(), self.expand.join(","));
    }
    params
  }
}

/// Filters for `GET /content`.
///
/// Unset filters are not sent. In particular a query without a content type
/// sends no `type` parameter, so the server's default (pages) applies.
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
  /// `page` or `blogpost`; `None` leaves the choice to the server.
  pub content_type: Option<ContentType>,
  pub space_key: Option<String>,
  pub title: Option<String>,
  pub status: Option<String>,
  /// Only honoured for blog posts; ignored for any other content type.
  pub posting_day: Option<NaiveDate>,
  pub expand: Vec<String>,
}

impl ContentQuery {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn content_type(mut self, content_type: ContentType) -> Self {
    self.content_type = Some(content_type);
    self
  }

  pub fn space_key(mut self, space_key: impl Into<String>) -> Self {
    self.space_key = Some(space_key.into());
    self
  }

  pub fn title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn status(mut self, status: impl Into<String>) -> Self {
    self.status = Some(status.into());
    self
  }

  pub fn posting_day(mut self, day: NaiveDate) -> Self {
    self.posting_day = Some(day);
    self
  }

  pub fn expand<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
    self.expand = fields.iter().map(|field| field.as_ref().to_string()).collect();
    self
  }
}

/// Filters for a CQL search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
  cql: String,
  pub cql_context: Option<String>,
  pub expand: Vec<String>,
}

impl SearchQuery {
  /// Create a search for `cql`.
  ///
  /// # Errors
  /// Returns [`ConfluenceError::InvalidArgument`] when the query is blank.
  pub fn new(cql: impl Into<String>) -> Result<Self> {
    let cql = cql.into();
    if cql.trim().is_empty() {
      return Err(ConfluenceError::invalid("a CQL query is required"));
    }
    Ok(Self {
      cql,
      cql_context: None,
      expand: Vec::new(),
    })
  }

  pub fn cql(&self) -> &str {
    &self.cql
  }

  /// JSON-serialised `SearchContext` to run the query in.
  pub fn cql_context(mut self, context: impl Into<String>) -> Self {
    self.cql_context = Some(context.into());
    self
  }

  pub fn expand<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
    self.expand = fields.iter().map(|field| field.as_ref().to_string()).collect();
    self
  }
}

/// Filters for `GET /space`.
#[derive(Debug, Clone, Default)]
pub struct SpaceQuery {
  /// Only these spaces are returned; unknown keys are ignored by the server.
  pub space_keys: Vec<String>,
  pub space_type: Option<SpaceType>,
  pub status: Option<SpaceStatus>,
  pub label: Option<String>,
  /// Favourited-by-caller filter. Passed through as-is; whether the server
  /// honours it is unverified.
  pub favourite: Option<bool>,
  pub expand: Vec<String>,
}

impl SpaceQuery {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn space_keys<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
    self.space_keys = keys.iter().map(|key| key.as_ref().to_string()).collect();
    self
  }

  pub fn space_type(mut self, space_type: SpaceType) -> Self {
    self.space_type = Some(space_type);
    self
  }

  pub fn status(mut self, status: SpaceStatus) -> Self {
    self.status = Some(status);
    self
  }

  pub fn label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }

  pub fn favourite(mut self, favourite: bool) -> Self {
    self.favourite = Some(favourite);
    self
  }

  pub fn expand<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
    self.expand = fields.iter().map(|field| field.as_ref().to_string()).collect();
    self
  }
}

/// Identifies a user by exactly one of username or user key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
  Username(String),
  Key(String),
}

impl UserLookup {
  /// Build a lookup from two optional identifiers. Empty strings count as
  /// absent.
  ///
  /// # Errors
  /// Returns [`ConfluenceError::InvalidArgument`] unless exactly one of
  /// `username` and `user_key` is set.
  pub fn new(username: Option<String>, user_key: Option<String>) -> Result<Self> {
    let username = username.filter(|value| !value.is_empty());
    let user_key = user_key.filter(|value| !value.is_empty());

    match (username, user_key) {
      (Some(username), None) => Ok(Self::Username(username)),
      (None, Some(key)) => Ok(Self::Key(key)),
      _ => Err(ConfluenceError::invalid("exactly one of username or user key must be set")),
    }
  }

  fn apply(&self, request: ApiRequest) -> ApiRequest {
    match self {
      Self::Username(username) => request.param("username", Some(username.as_str())),
      Self::Key(key) => request.param("key", Some(key.as_str())),
    }
  }
}

/// Percent-encode a caller-supplied value as a single path segment.
fn segment(value: &str) -> String {
  url::form_urlencoded::byte_serialize(value.as_bytes())
    .collect::<String>()
    .replace('+', "%20")
}

pub fn content(query: &ContentQuery) -> ApiRequest {
  let posting_day = match query.content_type {
    Some(ContentType::BlogPost) => query.posting_day.map(|day| day.format("%Y-%m-%d").to_string()),
    _ => None,
  };

  ApiRequest::new("content")
    .param("type", query.content_type.map(|content_type| content_type.as_str()))
    .param("spaceKey", query.space_key.as_deref())
    .param("title", query.title.as_deref())
    .param("status", query.status.as_deref())
    .param("postingDay", posting_day)
    .expand(&query.expand)
}

pub fn search(query: &SearchQuery) -> ApiRequest {
  ApiRequest::new("content/search")
    .param("cql", Some(query.cql.as_str()))
    .param("cqlcontext", query.cql_context.as_deref())
    .expand(&query.expand)
}

pub fn spaces(query: &SpaceQuery) -> ApiRequest {
  let keys = query
    .space_keys
    .iter()
    .map(|key| key.trim())
    .filter(|key| !key.is_empty())
    .collect::<Vec<_>>()
    .join(",");

  // Only `true` is forwarded, as the upstream client does.
  let favourite = query.favourite.filter(|favourite| *favourite).map(|_| "true");

  ApiRequest::new("space")
    .param("spaceKey", Some(keys))
    .param("type", query.space_type.map(|space_type| space_type.as_str()))
    .param("status", query.status.map(|status| status.as_str()))
    .param("label", query.label.as_deref())
    .param("favourite", favourite)
    .expand(&query.expand)
}

pub fn space<S: AsRef<str>>(space_key: &str, expand: &[S]) -> ApiRequest {
  ApiRequest::new(format!("space/{}", segment(space_key))).expand(expand)
}

pub fn space_content<S: AsRef<str>>(
  space_key: &str,
  content_type: Option<ContentType>,
  root_only: bool,
  expand: &[S],
) -> ApiRequest {
  let path = match content_type {
    Some(content_type) => format!("space/{}/content/{}", segment(space_key), content_type.as_str()),
    None => format!("space/{}/content", segment(space_key)),
  };

  ApiRequest::new(path)
    .param("depth", root_only.then_some("root"))
    .expand(expand)
}

pub fn user<S: AsRef<str>>(lookup: &UserLookup, expand: &[S]) -> ApiRequest {
  lookup.apply(ApiRequest::new("user")).expand(expand)
}

pub fn anonymous_user() -> ApiRequest {
  ApiRequest::new("user/anonymous")
}

pub fn current_user() -> ApiRequest {
  ApiRequest::new("user/current")
}

pub fn user_groups<S: AsRef<str>>(lookup: &UserLookup, expand: &[S]) -> ApiRequest {
  lookup.apply(ApiRequest::new("user/memberof")).expand(expand)
}

pub fn groups<S: AsRef<str>>(expand: &[S]) -> ApiRequest {
  ApiRequest::new("group").expand(expand)
}

pub fn group<S: AsRef<str>>(name: &str, expand: &[S]) -> ApiRequest {
  ApiRequest::new(format!("group/{}", segment(name))).expand(expand)
}

pub fn group_members<S: AsRef<str>>(name: &str, expand: &[S]) -> ApiRequest {
  ApiRequest::new(format!("group/{}/member", segment(name))).expand(expand)
}

pub fn long_tasks<S: AsRef<str>>(expand: &[S]) -> ApiRequest {
  ApiRequest::new("longtask").expand(expand)
}

pub fn long_task<S: AsRef<str>>(task_id: &str, expand: &[S]) -> ApiRequest {
  ApiRequest::new(format!("longtask/{}", segment(task_id))).expand(expand)
}

#[cfg(test)]
mod tests {
  use super::*;

  const NO_EXPAND: &[&str] = &[];

  fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
  }

  #[test]
  fn content_drops_posting_day_for_pages() {
    let query = ContentQuery::new().content_type(ContentType::Page).posting_day(day());
    let request = content(&query);

    assert_eq!(request.path, "content");
    assert_eq!(request.params.get("type").map(String::as_str), Some("page"));
    assert!(!request.params.contains_key("postingDay"));
  }

  #[test]
  fn content_drops_posting_day_without_type() {
    let request = content(&ContentQuery::new().posting_day(day()));
    assert!(request.params.is_empty());
  }

  #[test]
  fn content_formats_posting_day_for_blog_posts() {
    let query = ContentQuery::new().content_type(ContentType::BlogPost).posting_day(day());
    let request = content(&query);

    assert_eq!(request.params.get("type").map(String::as_str), Some("blogpost"));
    assert_eq!(request.params.get("postingDay").map(String::as_str), Some("2024-03-05"));
  }

  #[test]
  fn content_maps_all_filters() {
    let query = ContentQuery::new()
      .space_key("DOCS")
      .title("Release Notes")
      .status("current")
      .expand(&["body.storage", "space"]);
    let params = content(&query).query_params();

    assert_eq!(params.get("spaceKey").map(String::as_str), Some("DOCS"));
    assert_eq!(params.get("title").map(String::as_str), Some("Release Notes"));
    assert_eq!(params.get("status").map(String::as_str), Some("current"));
    assert_eq!(params.get("expand").map(String::as_str), Some("body.storage,space"));
    assert!(!params.contains_key("type"));
  }

  #[test]
  fn default_content_query_leaves_type_to_server() {
    let request = content(&ContentQuery::default());
    assert_eq!(request.path, "content");
    assert!(!request.query_params().contains_key("type"));
  }

  #[test]
  fn empty_filters_are_skipped() {
    let query = ContentQuery::new().space_key("").title("");
    assert!(content(&query).params.is_empty());
  }

  #[test]
  fn expand_is_omitted_when_empty() {
    let request = space("DOCS", NO_EXPAND);
    assert!(!request.query_params().contains_key("expand"));
  }

  #[test]
  fn expand_ignores_blank_fields() {
    let request = groups(&["", " members "]);
    assert_eq!(request.query_params().get("expand").map(String::as_str), Some("members"));
  }

  #[test]
  fn search_requires_cql() {
    let err = SearchQuery::new("   ").unwrap_err();
    assert!(err.is_invalid_argument());
  }

  #[test]
  fn search_maps_context() {
    let query = SearchQuery::new("type=page AND space=DOCS")
      .unwrap()
      .cql_context("{\"spaceKey\":\"DOCS\"}");
    let request = search(&query);

    assert_eq!(request.path, "content/search");
    assert_eq!(
      request.params.get("cql").map(String::as_str),
      Some("type=page AND space=DOCS")
    );
    assert_eq!(
      request.params.get("cqlcontext").map(String::as_str),
      Some("{\"spaceKey\":\"DOCS\"}")
    );
  }

  #[test]
  fn spaces_joins_keys_and_enums() {
    let query = SpaceQuery::new()
      .space_keys(&["DOCS", "ENG"])
      .space_type(SpaceType::Global)
      .status(SpaceStatus::Current)
      .label("team");
    let request = spaces(&query);

    assert_eq!(request.path, "space");
    assert_eq!(request.params.get("spaceKey").map(String::as_str), Some("DOCS,ENG"));
    assert_eq!(request.params.get("type").map(String::as_str), Some("global"));
    assert_eq!(request.params.get("status").map(String::as_str), Some("current"));
    assert_eq!(request.params.get("label").map(String::as_str), Some("team"));
    assert!(!request.params.contains_key("favourite"));
  }

  // Pass-through only: the effect of `favourite` on a live server is unverified.
  #[test]
  fn spaces_passes_favourite_through() {
    let request = spaces(&SpaceQuery::new().favourite(true));
    assert_eq!(request.params.get("favourite").map(String::as_str), Some("true"));

    let request = spaces(&SpaceQuery::new().favourite(false));
    assert!(!request.params.contains_key("favourite"));
  }

  #[test]
  fn space_content_paths() {
    let request = space_content("DOCS", None, false, NO_EXPAND);
    assert_eq!(request.path, "space/DOCS/content");
    assert!(request.params.is_empty());

    let request = space_content("DOCS", Some(ContentType::BlogPost), true, NO_EXPAND);
    assert_eq!(request.path, "space/DOCS/content/blogpost");
    assert_eq!(request.params.get("depth").map(String::as_str), Some("root"));
  }

  #[test]
  fn path_segments_are_encoded() {
    assert_eq!(group("confluence users", NO_EXPAND).path, "group/confluence%20users");
    assert_eq!(group_members("a/b", NO_EXPAND).path, "group/a%2Fb/member");
    assert_eq!(space("~jdoe", NO_EXPAND).path, "space/%7Ejdoe");
  }

  #[test]
  fn user_lookup_requires_exactly_one_identifier() {
    assert!(UserLookup::new(None, None).unwrap_err().is_invalid_argument());
    assert!(
      UserLookup::new(Some("jdoe".into()), Some("ff80".into()))
        .unwrap_err()
        .is_invalid_argument()
    );
    assert!(
      UserLookup::new(Some(String::new()), Some(String::new()))
        .unwrap_err()
        .is_invalid_argument()
    );
    assert_eq!(
      UserLookup::new(Some("jdoe".into()), Some(String::new())).unwrap(),
      UserLookup::Username("jdoe".into())
    );
  }

  #[test]
  fn user_requests_use_the_chosen_identifier() {
    let by_name = user(&UserLookup::Username("jdoe".into()), NO_EXPAND);
    assert_eq!(by_name.path, "user");
    assert_eq!(by_name.params.get("username").map(String::as_str), Some("jdoe"));
    assert!(!by_name.params.contains_key("key"));

    let by_key = user_groups(&UserLookup::Key("ff80".into()), NO_EXPAND);
    assert_eq!(by_key.path, "user/memberof");
    assert_eq!(by_key.params.get("key").map(String::as_str), Some("ff80"));
    assert!(!by_key.params.contains_key("username"));
  }

  #[test]
  fn fixed_paths() {
    assert_eq!(anonymous_user().path, "user/anonymous");
    assert_eq!(current_user().path, "user/current");
    assert_eq!(groups(NO_EXPAND).path, "group");
    assert_eq!(long_tasks(NO_EXPAND).path, "longtask");
    assert_eq!(
      long_task("0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0", NO_EXPAND).path,
      "longtask/0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0"
    );
  }
}
