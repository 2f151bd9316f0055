//! Client side of the portal content backend.
//!
//! [`ContentApi`] is the seam every controller talks through. [`HttpContentApi`]
//! implements it over JSON/HTTP with timeouts and retries; [`InMemoryContentApi`]
//! serves a fixed content tree for offline use and tests.

use async_trait::async_trait;
use content::{ContentNode, Page};
use entities::SearchResponse;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod http;
pub mod memory;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpContentApi;
pub use memory::{ApiCall, InMemoryContentApi};

/// Parent of a listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentRef {
    /// Top-level collection, nothing to wait for
    Root,
    /// Children of the node with this id
    Id(String),
    /// The parent id is not known yet
    Unresolved,
}

impl ParentRef {
    /// `Unresolved` for a missing or blank id
    pub fn from_option(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => ParentRef::Id(id.to_string()),
            _ => ParentRef::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, ParentRef::Unresolved)
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ParentRef::Id(id) => Some(id),
            _ => None,
        }
    }
}

/// A "list by parent" call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListRequest {
    pub collection: String,
    pub parent: ParentRef,
    pub page: u32,
    pub page_size: u32,
    pub query: Option<String>,
}

impl ListRequest {
    pub fn new(collection: impl Into<String>, parent: ParentRef) -> Self {
        Self {
            collection: collection.into(),
            parent,
            page: 1,
            page_size: 10,
            query: None,
        }
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Free-text filter; blank queries are dropped
    pub fn query(mut self, query: Option<impl Into<String>>) -> Self {
        self.query = query
            .map(Into::into)
            .filter(|q: &String| !q.trim().is_empty());
        self
    }
}

/// A search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

/// Operations the portal needs from the content backend
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// One page of the children of `request.parent` in `request.collection`
    async fn list(&self, request: &ListRequest) -> ApiResult<Page<ContentNode>>;

    /// Full node, including body content
    async fn get_by_id(&self, collection: &str, id: &str) -> ApiResult<ContentNode>;

    async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse>;

    /// Succeeds when the backend is reachable and healthy
    async fn health(&self) -> ApiResult<()>;
}
