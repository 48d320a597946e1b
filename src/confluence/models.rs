//! Data transfer objects returned by the Confluence REST API.
//!
//! Fields that Confluence only includes when the corresponding expansion is
//! requested are modelled as `Option`s. See
//! <https://developer.atlassian.com/server/confluence/expansions-in-the-rest-api/>.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of content accepted by content filters and space-content paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
  /// Regular page.
  Page,
  /// Blog post.
  #[value(name = "blogpost", alias = "blog")]
  BlogPost,
}

impl ContentType {
  /// Value sent on the wire.
  pub fn as_str(&self) -> &'static str {
    match self {
      ContentType::Page => "page",
      ContentType::BlogPost => "blogpost",
    }
  }
}

/// Space classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
  Global,
  Personal,
}

impl SpaceType {
  /// Value sent on the wire.
  pub fn as_str(&self) -> &'static str {
    match self {
      SpaceType::Global => "global",
      SpaceType::Personal => "personal",
    }
  }
}

/// Space lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpaceStatus {
  Current,
  Archived,
}

impl SpaceStatus {
  /// Value sent on the wire.
  pub fn as_str(&self) -> &'static str {
    match self {
      SpaceStatus::Current => "current",
      SpaceStatus::Archived => "archived",
    }
  }
}

/// A page or blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  /// Unique numeric identifier assigned by Confluence.
  pub id: String,
  /// Human-readable title displayed in the UI.
  pub title: String,
  #[serde(rename = "type")]
  /// Content type (typically `"page"` or `"blogpost"`).
  pub content_type: String,
  /// Publication status such as `"current"` or `"draft"`.
  pub status: String,
  /// Space the content belongs to, when `space` is expanded.
  #[serde(default)]
  pub space: Option<Box<Space>>,
  /// Body representations, when any `body.*` expansion is requested.
  #[serde(default)]
  pub body: Option<ContentBody>,
  /// Authoring history, when `history` is expanded.
  #[serde(default)]
  pub history: Option<History>,
  /// Current version, when `version` is expanded.
  #[serde(default)]
  pub version: Option<Version>,
  #[serde(rename = "_links", default)]
  /// Useful hyperlinks, including the canonical UI URL.
  pub links: Option<Links>,
}

impl Page {
  /// Whether the server tagged this content as a blog post.
  pub fn is_blog_post(&self) -> bool {
    self.content_type == ContentType::BlogPost.as_str()
  }

  /// Preferred body representation, if any body was expanded.
  ///
  /// The most rendered representation present wins: anonymous_export_view,
  /// then styled_view, export_view, view, editor and finally storage.
  pub fn body_value(&self) -> Option<&str> {
    let body = self.body.as_ref()?;
    [
      &body.anonymous_export_view,
      &body.styled_view,
      &body.export_view,
      &body.view,
      &body.editor,
      &body.storage,
    ]
    .into_iter()
    .flatten()
    .map(|repr| repr.value.as_str())
    .next()
  }
}

impl fmt::Display for Page {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {}", self.id, self.title)
  }
}

/// Page body content in the representations Confluence can render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBody {
  #[serde(default)]
  pub storage: Option<BodyRepresentation>,
  #[serde(default)]
  pub editor: Option<BodyRepresentation>,
  #[serde(default)]
  pub view: Option<BodyRepresentation>,
  #[serde(default)]
  pub export_view: Option<BodyRepresentation>,
  #[serde(default)]
  pub styled_view: Option<BodyRepresentation>,
  #[serde(default)]
  pub anonymous_export_view: Option<BodyRepresentation>,
}

/// A single rendering of a content body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRepresentation {
  /// Markup for this representation.
  pub value: String,
  /// Representation name (e.g. `"storage"` or `"view"`).
  pub representation: String,
}

/// Authoring history of a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
  /// Whether this is the latest version.
  pub latest: bool,
  #[serde(rename = "createdDate")]
  /// Creation timestamp as reported by the server (ISO-8601).
  pub created_date: String,
  #[serde(rename = "createdBy")]
  /// Original author.
  pub created_by: User,
  #[serde(rename = "lastUpdated", default)]
  /// Most recent edit, when `history.lastUpdated` is expanded.
  pub last_updated: Option<Version>,
}

/// A content version record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
  /// User who made the change.
  #[serde(default)]
  pub by: Option<User>,
  /// Timestamp of the change (ISO-8601).
  pub when: String,
  /// Optional edit comment.
  #[serde(default)]
  pub message: Option<String>,
  /// Monotonic version number.
  pub number: u64,
  #[serde(rename = "minorEdit", default)]
  pub minor_edit: bool,
}

/// Hyperlinks attached to most resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
  #[serde(rename = "webui", default)]
  /// Path to the resource within the Confluence web UI.
  pub web_ui: Option<String>,
  #[serde(rename = "self", default)]
  /// Fully qualified API endpoint for the resource.
  pub self_link: Option<String>,
  #[serde(default)]
  pub tinyui: Option<String>,
}

/// A Confluence space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
  #[serde(default)]
  pub id: Option<u64>,
  /// Short key that uniquely identifies the space.
  pub key: String,
  /// Human-readable space name.
  pub name: String,
  #[serde(rename = "type")]
  /// Space classification such as `"global"` or `"personal"`.
  pub space_type: String,
  /// Lifecycle status; only returned by newer servers.
  #[serde(default)]
  pub status: Option<String>,
  /// Space description, when `description` is expanded.
  #[serde(default)]
  pub description: Option<SpaceDescription>,
  /// Home page, when `homepage` is expanded.
  #[serde(default)]
  pub homepage: Option<Box<Page>>,
  /// Label metadata, when `metadata.labels` is expanded.
  #[serde(default)]
  pub metadata: Option<SpaceMetadata>,
  #[serde(default)]
  pub icon: Option<Icon>,
  #[serde(rename = "_links", default)]
  pub links: Option<Links>,
}

impl Space {
  /// Label names attached to the space, if labels were expanded.
  pub fn labels(&self) -> Vec<&str> {
    self
      .metadata
      .as_ref()
      .and_then(|metadata| metadata.labels.as_ref())
      .map(|labels| labels.results.iter().map(|label| label.name.as_str()).collect())
      .unwrap_or_default()
  }
}

/// Space description in its available renderings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceDescription {
  #[serde(default)]
  pub plain: Option<BodyRepresentation>,
  #[serde(default)]
  pub view: Option<BodyRepresentation>,
}

/// Space metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceMetadata {
  #[serde(default)]
  pub labels: Option<LabelArray>,
}

/// Wrapper Confluence uses around label lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelArray {
  pub results: Vec<Label>,
}

/// A single label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
  /// Namespace of the label, e.g. `"global"` or `"my"`.
  pub prefix: String,
  pub name: String,
  #[serde(default)]
  pub id: Option<String>,
}

/// Icon or profile picture reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Icon {
  pub path: String,
  #[serde(default)]
  pub width: Option<u32>,
  #[serde(default)]
  pub height: Option<u32>,
  #[serde(rename = "isDefault", default)]
  pub is_default: bool,
}

/// A Confluence user.
///
/// Server instances identify users by `username` and the opaque `userKey`;
/// Cloud instances only return `accountId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "type")]
  /// `"known"`, `"anonymous"`, or `"unknown"`.
  pub user_type: String,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(rename = "userKey", default)]
  pub user_key: Option<String>,
  #[serde(rename = "accountId", default)]
  pub account_id: Option<String>,
  #[serde(rename = "displayName", default)]
  /// Full display name configured in the profile.
  pub display_name: Option<String>,
  #[serde(rename = "profilePicture", default)]
  pub profile_picture: Option<Icon>,
}

impl User {
  /// Best identifier available for display: username, then key, then
  /// account id.
  pub fn identifier(&self) -> &str {
    self
      .username
      .as_deref()
      .or(self.user_key.as_deref())
      .or(self.account_id.as_deref())
      .unwrap_or(self.user_type.as_str())
  }
}

/// A user group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  #[serde(rename = "type")]
  pub group_type: String,
  /// Group name, unique per instance.
  pub name: String,
}

/// Status snapshot of a long-running server task, such as a space export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTask {
  /// Task identifier (GUID-shaped).
  pub id: String,
  #[serde(default)]
  pub name: Option<LongTaskName>,
  #[serde(rename = "elapsedTime", default)]
  /// Milliseconds since the task started.
  pub elapsed_time: Option<u64>,
  #[serde(rename = "percentageComplete", default)]
  pub percentage_complete: Option<u8>,
  #[serde(default)]
  pub successful: Option<bool>,
  #[serde(default)]
  pub finished: Option<bool>,
  #[serde(default)]
  pub messages: Vec<LongTaskMessage>,
}

impl LongTask {
  /// Human readable task name, falling back to the id.
  pub fn display_name(&self) -> &str {
    self.name.as_ref().map(|name| name.key.as_str()).unwrap_or(self.id.as_str())
  }
}

/// i18n key and arguments naming a long task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTaskName {
  pub key: String,
  #[serde(default)]
  pub args: Vec<serde_json::Value>,
}

/// Progress message emitted by a long task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTaskMessage {
  #[serde(default)]
  pub translation: Option<String>,
  #[serde(default)]
  pub args: Vec<serde_json::Value>,
}

/// One page of a paginated collection.
///
/// Items are kept as raw JSON so they can be hydrated one at a time while
/// the page is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultPage {
  /// Raw items on this page.
  pub results: Vec<serde_json::Value>,
  #[serde(rename = "_links")]
  /// Pagination links; `next` is absent on the final page.
  pub links: PageLinks,
}

/// Pagination links of a [`ResultPage`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
  /// Path (relative to the base URL) of the next page.
  #[serde(default)]
  pub next: Option<String>,
}
