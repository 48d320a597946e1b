//! Confluence module providing the query trait, the HTTP client and session,
//! lazy pagination, query builders and data models.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod pager;
pub mod query;

pub use api::ConfluenceApi;
pub use client::{Confluence, Session};
pub use error::{ConfluenceError, Result};
pub use models::{
  BodyRepresentation, ContentBody, ContentType, Group, History, Links, LongTask, Page, Space, SpaceStatus, SpaceType,
  User, Version,
};
pub use pager::{Pager, hydrate};
pub use query::{ApiRequest, ContentQuery, SearchQuery, SpaceQuery, UserLookup};
