//! Fake Confluence API client for testing
//!
//! Serves predefined fixtures through the [`ConfluenceApi`] trait without
//! making any network requests, and records every call it receives.

use std::sync::Mutex;

use async_trait::async_trait;
use confluence_query::confluence::{
  ConfluenceApi, ConfluenceError, ContentQuery, ContentType, Group, LongTask, Page, Pager, Result, SearchQuery, Space,
  SpaceQuery, User, UserLookup,
};
use futures::StreamExt;
use futures::stream;

use crate::common::fixtures;

/// A fake Confluence client that returns predefined responses for testing
#[derive(Default)]
pub struct FakeConfluenceClient {
  pages: Vec<Page>,
  spaces: Vec<Space>,
  users: Vec<User>,
  groups: Vec<(Group, Vec<String>)>,
  tasks: Vec<LongTask>,
  anonymous: Option<User>,
  calls: Mutex<Vec<String>>,
}

impl FakeConfluenceClient {
  /// Create a new fake client with no data
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a fake client populated from the fixtures
  pub fn with_samples() -> Self {
    let mut client = Self::new();

    client.pages = [
      fixtures::sample_page(),
      fixtures::sample_install_page(),
      fixtures::sample_blog_post(),
    ]
    .into_iter()
    .map(from_fixture)
    .collect();
    client.spaces = vec![
      from_fixture(fixtures::sample_space()),
      from_fixture(fixtures::sample_personal_space()),
    ];
    client.users = vec![
      from_fixture(fixtures::sample_user()),
      from_fixture(fixtures::sample_other_user()),
    ];
    client.groups = vec![
      (
        from_fixture(fixtures::sample_group("confluence-users")),
        vec!["jdoe".to_string(), "rroe".to_string()],
      ),
      (
        from_fixture(fixtures::sample_group("confluence-administrators")),
        vec!["jdoe".to_string()],
      ),
    ];
    client.tasks = vec![
      from_fixture(fixtures::sample_long_task()),
      from_fixture(fixtures::sample_running_task()),
    ];
    client.anonymous = Some(from_fixture(fixtures::sample_anonymous_user()));

    client
  }

  /// Names of the trait methods called so far, in order
  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: &str) {
    self.calls.lock().unwrap().push(call.to_string());
  }

  fn find_user(&self, lookup: &UserLookup) -> Option<&User> {
    self.users.iter().find(|user| match lookup {
      UserLookup::Username(name) => user.username.as_deref() == Some(name.as_str()),
      UserLookup::Key(key) => user.user_key.as_deref() == Some(key.as_str()),
    })
  }

  fn pages_where(&self, keep: impl Fn(&Page) -> bool) -> Pager<'_, Page> {
    let matching: Vec<Page> = self.pages.iter().filter(|page| keep(page)).cloned().collect();
    items(matching)
  }
}

fn from_fixture<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
  serde_json::from_value(value).unwrap()
}

fn items<'a, T: Send + 'a>(values: Vec<T>) -> Pager<'a, T> {
  stream::iter(values.into_iter().map(Ok)).boxed()
}

fn not_found(what: &str) -> ConfluenceError {
  ConfluenceError::Status {
    status: reqwest::StatusCode::NOT_FOUND,
    url: format!("https://wiki.example.com/rest/api/{what}"),
    body: format!(r#"{{"statusCode":404,"message":"No {what} found"}}"#),
  }
}

fn space_key_of(page: &Page) -> Option<&str> {
  page.space.as_ref().map(|space| space.key.as_str())
}

#[async_trait]
impl ConfluenceApi for FakeConfluenceClient {
  fn get_content(&self, query: &ContentQuery) -> Pager<'_, Page> {
    self.record("get_content");
    let query = query.clone();
    self.pages_where(move |page| {
      query.content_type.is_none_or(|ct| page.content_type == ct.as_str())
        && query.space_key.as_deref().is_none_or(|key| space_key_of(page) == Some(key))
        && query.title.as_deref().is_none_or(|title| page.title == title)
    })
  }

  fn search(&self, query: &SearchQuery) -> Pager<'_, Page> {
    self.record("search");
    // Only understands `space=KEY`.
    let space = query.cql().strip_prefix("space=").map(str::to_string);
    self.pages_where(move |page| space.as_deref().is_none_or(|key| space_key_of(page) == Some(key)))
  }

  fn get_spaces(&self, query: &SpaceQuery) -> Pager<'_, Space> {
    self.record("get_spaces");
    let matching = self
      .spaces
      .iter()
      .filter(|space| query.space_keys.is_empty() || query.space_keys.contains(&space.key))
      .filter(|space| query.space_type.is_none_or(|st| space.space_type == st.as_str()))
      .cloned()
      .collect();
    items(matching)
  }

  async fn get_space(&self, space_key: &str, _expand: &[String]) -> Result<Space> {
    self.record("get_space");
    self
      .spaces
      .iter()
      .find(|space| space.key == space_key)
      .cloned()
      .ok_or_else(|| not_found(&format!("space/{space_key}")))
  }

  fn get_space_content(&self, space_key: &str, _root_only: bool, _expand: &[String]) -> Pager<'_, Page> {
    self.record("get_space_content");
    let space_key = space_key.to_string();
    self.pages_where(move |page| space_key_of(page) == Some(space_key.as_str()))
  }

  fn get_space_content_with_type(
    &self,
    space_key: &str,
    content_type: ContentType,
    _root_only: bool,
    _expand: &[String],
  ) -> Pager<'_, Page> {
    self.record("get_space_content_with_type");
    let space_key = space_key.to_string();
    self.pages_where(move |page| {
      space_key_of(page) == Some(space_key.as_str()) && page.content_type == content_type.as_str()
    })
  }

  async fn get_user(&self, lookup: &UserLookup, _expand: &[String]) -> Result<User> {
    self.record("get_user");
    self.find_user(lookup).cloned().ok_or_else(|| not_found("user"))
  }

  async fn get_anonymous_user(&self) -> Result<User> {
    self.record("get_anonymous_user");
    self.anonymous.clone().ok_or_else(|| not_found("user/anonymous"))
  }

  async fn get_current_user(&self) -> Result<User> {
    self.record("get_current_user");
    self.users.first().cloned().ok_or_else(|| not_found("user/current"))
  }

  fn get_user_groups(&self, lookup: &UserLookup, _expand: &[String]) -> Pager<'_, Group> {
    self.record("get_user_groups");
    let Some(username) = self.find_user(lookup).and_then(|user| user.username.clone()) else {
      return stream::iter([Err(not_found("user/memberof"))]).boxed();
    };
    let groups = self
      .groups
      .iter()
      .filter(|(_, members)| members.contains(&username))
      .map(|(group, _)| group.clone())
      .collect();
    items(groups)
  }

  fn get_groups(&self, _expand: &[String]) -> Pager<'_, Group> {
    self.record("get_groups");
    items(self.groups.iter().map(|(group, _)| group.clone()).collect())
  }

  async fn get_group(&self, name: &str, _expand: &[String]) -> Result<Group> {
    self.record("get_group");
    self
      .groups
      .iter()
      .find(|(group, _)| group.name == name)
      .map(|(group, _)| group.clone())
      .ok_or_else(|| not_found(&format!("group/{name}")))
  }

  fn get_group_members(&self, name: &str, _expand: &[String]) -> Pager<'_, User> {
    self.record("get_group_members");
    let members: Vec<String> = self
      .groups
      .iter()
      .find(|(group, _)| group.name == name)
      .map(|(_, members)| members.clone())
      .unwrap_or_default();
    let users = self
      .users
      .iter()
      .filter(|user| user.username.as_ref().is_some_and(|username| members.contains(username)))
      .cloned()
      .collect();
    items(users)
  }

  fn get_long_tasks(&self, _expand: &[String]) -> Pager<'_, LongTask> {
    self.record("get_long_tasks");
    items(self.tasks.clone())
  }

  async fn get_long_task(&self, task_id: &str, _expand: &[String]) -> Result<LongTask> {
    self.record("get_long_task");
    self
      .tasks
      .iter()
      .find(|task| task.id == task_id)
      .cloned()
      .ok_or_else(|| not_found(&format!("longtask/{task_id}")))
  }
}

#[cfg(test)]
mod tests {
  use futures::TryStreamExt;

  use super::*;

  #[tokio::test]
  async fn test_fake_client_empty() {
    let client = FakeConfluenceClient::new();
    assert!(client.get_space("DOCS", &[]).await.is_err());
    let pages: Vec<Page> = client.get_content(&ContentQuery::new()).try_collect().await.unwrap();
    assert!(pages.is_empty());
  }

  #[tokio::test]
  async fn test_fake_client_records_calls() {
    let client = FakeConfluenceClient::with_samples();
    client.get_current_user().await.unwrap();
    let _ = client.get_groups(&[]);
    assert_eq!(client.calls(), vec!["get_current_user", "get_groups"]);
  }

  #[tokio::test]
  async fn test_fake_client_missing_task_is_404() {
    let client = FakeConfluenceClient::with_samples();
    let err = client.get_long_task("nope", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
  }
}
