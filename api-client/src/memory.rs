use async_trait::async_trait;
use content::{sort_siblings, ContentNode, Page, Pagination};
use entities::{SearchMetadata, SearchResponse, SearchResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    ContentApi, ListRequest, ParentRef, SearchRequest,
};

/// A call received by [`InMemoryContentApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List(ListRequest),
    GetById { collection: String, id: String },
    Search(SearchRequest),
    Health,
}

/// Backend serving a fixed content tree from memory.
///
/// Records every call so callers can assert on network traffic, and can be
/// told to fail a collection to exercise error paths.
#[derive(Default)]
pub struct InMemoryContentApi {
    children: HashMap<(String, ParentRef), Vec<ContentNode>>,
    details: HashMap<(String, String), ContentNode>,
    search_index: Vec<SearchResult>,
    failures: Mutex<HashMap<String, ApiError>>,
    calls: Mutex<Vec<ApiCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryContentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the children of `parent` in `collection`
    pub fn with_children(
        mut self,
        collection: impl Into<String>,
        parent: ParentRef,
        nodes: Vec<ContentNode>,
    ) -> Self {
        self.children.insert((collection.into(), parent), nodes);
        self
    }

    /// Register the full version of a node, returned by `get_by_id`
    pub fn with_detail(mut self, collection: impl Into<String>, node: ContentNode) -> Self {
        self.details.insert((collection.into(), node.id.clone()), node);
        self
    }

    pub fn with_search_index(mut self, results: Vec<SearchResult>) -> Self {
        self.search_index = results;
        self
    }

    /// Make every call touching `collection` fail with `error` until cleared
    pub fn fail_collection(&self, collection: impl Into<String>, error: ApiError) {
        lock(&self.failures).insert(collection.into(), error);
    }

    pub fn clear_failure(&self, collection: &str) {
        lock(&self.failures).remove(collection);
    }

    /// Make `get_by_id` fail for one node until cleared; listings still work
    pub fn fail_detail(&self, collection: &str, id: &str, error: ApiError) {
        lock(&self.failures).insert(detail_key(collection, id), error);
    }

    pub fn clear_detail_failure(&self, collection: &str, id: &str) {
        lock(&self.failures).remove(&detail_key(collection, id));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, call: ApiCall) {
        lock(&self.calls).push(call);
    }

    fn check_failure(&self, collection: &str) -> ApiResult<()> {
        match lock(&self.failures).get(collection) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn detail_key(collection: &str, id: &str) -> String {
    format!("{}#{}", collection, id)
}

fn matches_query(haystacks: &[Option<&str>], query: &str) -> bool {
    let query = query.to_lowercase();
    haystacks
        .iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&query))
}

/// Slice `items` to the requested page
fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> (Vec<T>, Pagination) {
    let pagination = Pagination::new(page, page_size, items.len() as u64);
    let data = if page > pagination.pages_count.max(1) {
        Vec::new()
    } else {
        items
            .iter()
            .skip(pagination.offset() as usize)
            .take(page_size as usize)
            .cloned()
            .collect()
    };
    (data, pagination)
}

#[async_trait]
impl ContentApi for InMemoryContentApi {
    async fn list(&self, request: &ListRequest) -> ApiResult<Page<ContentNode>> {
        self.record(ApiCall::List(request.clone()));
        Pagination::check_request(request.page, request.page_size)?;
        self.check_failure(&request.collection)?;

        if !request.parent.is_resolved() {
            return Err(ApiError::InvalidRequest(format!(
                "cannot list {} before its parent is resolved",
                request.collection
            )));
        }

        let mut nodes: Vec<ContentNode> = self
            .children
            .get(&(request.collection.clone(), request.parent.clone()))
            .cloned()
            .unwrap_or_default();
        if let Some(query) = &request.query {
            nodes.retain(|node| {
                matches_query(
                    &[Some(&node.name), node.name_en.as_deref(), node.summary_en.as_deref()],
                    query,
                )
            });
        }
        sort_siblings(&mut nodes);

        let (data, pagination) = paginate(&nodes, request.page, request.page_size);
        debug!(
            "in-memory list {} {:?}: {} of {} items",
            request.collection,
            request.parent,
            data.len(),
            nodes.len()
        );
        Ok(Page { data, pagination })
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> ApiResult<ContentNode> {
        self.record(ApiCall::GetById {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self.check_failure(collection)?;
        self.check_failure(&detail_key(collection, id))?;

        if let Some(node) = self.details.get(&(collection.to_string(), id.to_string())) {
            return Ok(node.clone());
        }

        self.children
            .iter()
            .filter(|((c, _), _)| c == collection)
            .flat_map(|(_, nodes)| nodes)
            .find(|node| node.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("{}/{}", collection, id)))
    }

    async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        self.record(ApiCall::Search(request.clone()));
        Pagination::check_request(request.page, request.page_size)?;
        self.check_failure("search")?;
        let started = Instant::now();

        let hits: Vec<SearchResult> = self
            .search_index
            .iter()
            .filter(|r| {
                matches_query(
                    &[
                        Some(&r.title),
                        r.title_en.as_deref(),
                        r.summary.as_deref(),
                        r.summary_en.as_deref(),
                    ],
                    &request.query,
                )
            })
            .cloned()
            .collect();

        let (all_results, pagination) = paginate(&hits, request.page, request.page_size);
        let mut types_with_results = Vec::new();
        for hit in &hits {
            if !types_with_results.contains(&hit.entity_type) {
                types_with_results.push(hit.entity_type);
            }
        }

        let response = SearchResponse {
            results_by_type: Some(SearchResponse::group_by_type(&all_results)),
            all_results,
            metadata: SearchMetadata {
                query: request.query.clone(),
                total_results: hits.len() as u64,
                execution_time_ms: started.elapsed().as_millis() as u64,
                entity_types_with_results_list: types_with_results,
            },
            pagination,
        };
        Ok(response.normalized(request.page_size))
    }

    async fn health(&self) -> ApiResult<()> {
        self.record(ApiCall::Health);
        self.check_failure("health")
    }
}
