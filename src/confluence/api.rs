//! Trait definitions for querying Confluence.

use async_trait::async_trait;

use super::client::Confluence;
use super::error::Result;
use super::models::{ContentType, Group, LongTask, Page, Space, User};
use super::pager::Pager;
use super::query::{self, ContentQuery, SearchQuery, SpaceQuery, UserLookup};

/// Read-only Confluence operations (enables testing with fake
/// implementations).
///
/// Collection endpoints return a lazy [`Pager`]; nothing is fetched until the
/// stream is polled. Single-object lookups issue exactly one request.
#[async_trait]
pub trait ConfluenceApi: Send + Sync {
  /// List pages or blog posts matching the filters (`GET /content`).
  fn get_content(&self, query: &ContentQuery) -> Pager<'_, Page>;

  /// Run a CQL search (`GET /content/search`).
  fn search(&self, query: &SearchQuery) -> Pager<'_, Page>;

  /// List spaces matching the filters (`GET /space`).
  fn get_spaces(&self, query: &SpaceQuery) -> Pager<'_, Space>;

  /// Fetch one space by key.
  async fn get_space(&self, space_key: &str, expand: &[String]) -> Result<Space>;

  /// List all content in a space.
  ///
  /// # Arguments
  /// * `space_key` - Key of the space to list.
  /// * `root_only` - Only return top-level content.
  /// * `expand` - Fields to expand on each item.
  fn get_space_content(&self, space_key: &str, root_only: bool, expand: &[String]) -> Pager<'_, Page>;

  /// List content of one type in a space.
  fn get_space_content_with_type(
    &self,
    space_key: &str,
    content_type: ContentType,
    root_only: bool,
    expand: &[String],
  ) -> Pager<'_, Page>;

  /// Fetch one user by username or user key.
  async fn get_user(&self, lookup: &UserLookup, expand: &[String]) -> Result<User>;

  /// The user object representing anonymous access.
  async fn get_anonymous_user(&self) -> Result<User>;

  /// The authenticated user.
  async fn get_current_user(&self) -> Result<User>;

  /// Groups the given user is a member of.
  fn get_user_groups(&self, lookup: &UserLookup, expand: &[String]) -> Pager<'_, Group>;

  /// Every group on the instance.
  fn get_groups(&self, expand: &[String]) -> Pager<'_, Group>;

  /// Fetch one group by name.
  async fn get_group(&self, name: &str, expand: &[String]) -> Result<Group>;

  /// Members of a group.
  fn get_group_members(&self, name: &str, expand: &[String]) -> Pager<'_, User>;

  /// Running and recently completed long tasks.
  fn get_long_tasks(&self, expand: &[String]) -> Pager<'_, LongTask>;

  /// Status of one long task.
  async fn get_long_task(&self, task_id: &str, expand: &[String]) -> Result<LongTask>;
}

#[async_trait]
impl ConfluenceApi for Confluence {
  fn get_content(&self, query: &ContentQuery) -> Pager<'_, Page> {
    self.paginate(&query::content(query))
  }

  fn search(&self, query: &SearchQuery) -> Pager<'_, Page> {
    self.paginate(&query::search(query))
  }

  fn get_spaces(&self, query: &SpaceQuery) -> Pager<'_, Space> {
    self.paginate(&query::spaces(query))
  }

  async fn get_space(&self, space_key: &str, expand: &[String]) -> Result<Space> {
    self.fetch_one(&query::space(space_key, expand)).await
  }

  fn get_space_content(&self, space_key: &str, root_only: bool, expand: &[String]) -> Pager<'_, Page> {
    self.paginate(&query::space_content(space_key, None, root_only, expand))
  }

  fn get_space_content_with_type(
    &self,
    space_key: &str,
    content_type: ContentType,
    root_only: bool,
    expand: &[String],
  ) -> Pager<'_, Page> {
    self.paginate(&query::space_content(space_key, Some(content_type), root_only, expand))
  }

  async fn get_user(&self, lookup: &UserLookup, expand: &[String]) -> Result<User> {
    self.fetch_one(&query::user(lookup, expand)).await
  }

  async fn get_anonymous_user(&self) -> Result<User> {
    self.fetch_one(&query::anonymous_user()).await
  }

  async fn get_current_user(&self) -> Result<User> {
    self.fetch_one(&query::current_user()).await
  }

  fn get_user_groups(&self, lookup: &UserLookup, expand: &[String]) -> Pager<'_, Group> {
    self.paginate(&query::user_groups(lookup, expand))
  }

  fn get_groups(&self, expand: &[String]) -> Pager<'_, Group> {
    self.paginate(&query::groups(expand))
  }

  async fn get_group(&self, name: &str, expand: &[String]) -> Result<Group> {
    self.fetch_one(&query::group(name, expand)).await
  }

  fn get_group_members(&self, name: &str, expand: &[String]) -> Pager<'_, User> {
    self.paginate(&query::group_members(name, expand))
  }

  fn get_long_tasks(&self, expand: &[String]) -> Pager<'_, LongTask> {
    self.paginate(&query::long_tasks(expand))
  }

  async fn get_long_task(&self, task_id: &str, expand: &[String]) -> Result<LongTask> {
    self.fetch_one(&query::long_task(task_id, expand)).await
  }
}
