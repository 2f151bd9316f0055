use entities::{EntityType, Facet, SearchResponse, SearchResult};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{aggregator::SearchAggregator, debounce::Debouncer, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Observable state of a search page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub page: u32,
    pub active_filter: Option<EntityType>,
    pub response: Option<SearchResponse>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            active_filter: None,
            response: None,
            loading: false,
            error: None,
        }
    }
}

impl SearchState {
    /// Results under the active filter, all results when there is none
    pub fn visible_results(&self) -> Vec<SearchResult> {
        match (&self.response, self.active_filter) {
            (None, _) => Vec::new(),
            (Some(response), None) => response.all_results.clone(),
            (Some(response), Some(entity_type)) => response.results_for(entity_type),
        }
    }

    pub fn facets(&self) -> Vec<Facet> {
        self.response
            .as_ref()
            .map(SearchResponse::facets)
            .unwrap_or_default()
    }
}

/// A search page: debounced typing, paging and client-side type filters.
///
/// Each backend dispatch is tagged with a generation; a response arriving
/// after a newer query or page was requested is dropped.
pub struct SearchSession {
    aggregator: SearchAggregator,
    debouncer: Debouncer,
    page_size: u32,
    generation: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl SearchSession {
    pub fn new(aggregator: SearchAggregator) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            aggregator,
            debouncer: Debouncer::default(),
            page_size: DEFAULT_PAGE_SIZE,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn with_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Handle a keystroke in the search box.
    ///
    /// The filter and page reset at once; the query is only sent if nothing
    /// else is typed during the debounce window.
    pub async fn type_query(&self, query: &str) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.query = query.to_string();
            state.page = 1;
            state.active_filter = None;
        });

        if !self.debouncer.settle().await {
            debug!("Query '{}' superseded while debouncing", query);
            return Ok(());
        }
        self.dispatch(query.to_string(), 1).await
    }

    /// Send `query` at once, as when the search form is submitted
    pub async fn submit(&self, query: &str, page: u32) -> Result<()> {
        content::Pagination::check_request(page, self.page_size)?;
        self.debouncer.cancel();
        self.state.send_modify(|state| {
            state.query = query.to_string();
            state.page = page;
            state.active_filter = None;
        });
        self.dispatch(query.to_string(), page).await
    }

    /// Fetch another page of the current query right away
    pub async fn set_page(&self, page: u32) -> Result<()> {
        content::Pagination::check_request(page, self.page_size)?;
        self.debouncer.cancel();
        let query = self.state.borrow().query.clone();
        self.state.send_modify(|state| state.page = page);
        self.dispatch(query, page).await
    }

    /// Show only results of `entity_type`. Never calls the backend.
    pub fn set_filter(&self, entity_type: Option<EntityType>) {
        self.state.send_if_modified(|state| {
            if state.active_filter == entity_type {
                return false;
            }
            state.active_filter = entity_type;
            true
        });
    }

    pub fn clear_filter(&self) {
        self.set_filter(None);
    }

    pub fn visible_results(&self) -> Vec<SearchResult> {
        self.state.borrow().visible_results()
    }

    pub fn facets(&self) -> Vec<Facet> {
        self.state.borrow().facets()
    }

    /// Abandon pending and in-flight work, e.g. when leaving the page
    pub fn cancel(&self) {
        self.debouncer.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }

    async fn dispatch(&self, query: String, page: u32) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(generation, |state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.aggregator.search(&query, page, self.page_size).await;

        match result {
            Ok(response) => {
                let written = self.update(generation, |state| {
                    state.page = response.pagination.current_page;
                    state.response = Some(response);
                    state.loading = false;
                });
                if !written {
                    debug!("Dropping stale search response for '{}' page {}", query, page);
                }
                Ok(())
            }
            Err(e) => {
                let written = self.update(generation, |state| {
                    state.error = Some(e.to_string());
                    state.loading = false;
                });
                if !written {
                    debug!("Ignoring stale search failure for '{}': {}", query, e);
                    return Ok(());
                }
                warn!("Search '{}' page {} failed: {}", query, page, e);
                Err(e)
            }
        }
    }

    /// Apply `change` only while `generation` is the latest dispatch, checked
    /// under the state lock
    fn update(&self, generation: u64, change: impl FnOnce(&mut SearchState)) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            change(state);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::{
        ApiCall, ApiError, ApiResult, ContentApi, InMemoryContentApi, ListRequest, SearchRequest,
    };
    use async_trait::async_trait;
    use content::{ContentNode, Page};
    use entities::SearchMetadata;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn hit(id: &str, entity_type: EntityType, title_en: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            entity_type,
            title: title_en.to_string(),
            title_en: Some(title_en.to_string()),
            summary: None,
            summary_en: None,
            image_url: None,
            highlights: Vec::new(),
            navigation_route: None,
            created_timestamp: None,
        }
    }

    fn index() -> Vec<SearchResult> {
        vec![
            hit("n1", EntityType::News, "abc phishing wave"),
            hit("d1", EntityType::Definition, "abc phishing"),
            hit("n2", EntityType::News, "abc phishing kits"),
            hit("v1", EntityType::Video, "backups explained"),
        ]
    }

    fn session(api: Arc<InMemoryContentApi>) -> SearchSession {
        SearchSession::new(SearchAggregator::new(api))
    }

    fn search_calls(api: &InMemoryContentApi) -> Vec<String> {
        api.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Search(request) => Some(request.query),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_sends_only_last_query() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        let session = session(api.clone());

        let (a, ab, abc) = tokio::join!(
            session.type_query("a"),
            async {
                sleep(Duration::from_millis(100)).await;
                session.type_query("ab").await
            },
            async {
                sleep(Duration::from_millis(200)).await;
                session.type_query("abc").await
            },
        );
        a.unwrap();
        ab.unwrap();
        abc.unwrap();

        assert_eq!(search_calls(&api), ["abc"]);
        let state = session.state();
        assert_eq!(state.query, "abc");
        assert_eq!(state.visible_results().len(), 3);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_resets_filter_and_page() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        let session = session(api);
        session.type_query("phishing").await.unwrap();
        session.set_filter(Some(EntityType::News));

        let (_, observed) = tokio::join!(session.type_query("phishing kits"), async {
            sleep(Duration::from_millis(1)).await;
            session.state()
        });
        assert_eq!(observed.active_filter, None);
        assert_eq!(observed.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_filter_restores_results_without_a_call() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        let session = session(api.clone());
        session.type_query("phishing").await.unwrap();
        assert_eq!(api.call_count(), 1);

        session.set_filter(Some(EntityType::News));
        assert_eq!(session.visible_results().len(), 2);
        session.set_filter(Some(EntityType::Definition));
        assert_eq!(session.visible_results().len(), 1);
        session.clear_filter();
        assert_eq!(session.visible_results().len(), 3);

        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_skips_debounce() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        let session = session(api.clone()).with_page_size(2);

        let started = tokio::time::Instant::now();
        session.submit("phishing", 2).await.unwrap();
        assert!(started.elapsed() < crate::DEFAULT_DEBOUNCE);

        let state = session.state();
        assert_eq!(state.page, 2);
        assert_eq!(state.visible_results().len(), 1);
        assert_eq!(search_calls(&api), ["phishing"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_makes_no_call() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        let session = session(api.clone());
        session.type_query("  ").await.unwrap();

        assert_eq!(api.call_count(), 0);
        assert!(session.visible_results().is_empty());
        assert!(session.facets().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_facets_follow_backend_order() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        let session = session(api);
        session.type_query("phishing").await.unwrap();

        let facets: Vec<_> = session
            .facets()
            .into_iter()
            .map(|f| (f.entity_type, f.count))
            .collect();
        assert_eq!(facets, [(EntityType::News, 2), (EntityType::Definition, 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_kept_in_state() {
        let api = Arc::new(InMemoryContentApi::new().with_search_index(index()));
        api.fail_collection("search", ApiError::Timeout("10s".into()));
        let session = session(api.clone());

        assert!(session.type_query("phishing").await.is_err());
        let state = session.state();
        assert!(state.error.is_some());
        assert!(!state.loading);

        api.clear_failure("search");
        session.set_page(1).await.unwrap();
        assert_eq!(session.state().error, None);
    }

    /// Answers after a delay chosen per request
    struct DelayedSearch;

    #[async_trait]
    impl ContentApi for DelayedSearch {
        async fn list(&self, _: &ListRequest) -> ApiResult<Page<ContentNode>> {
            Err(ApiError::InvalidRequest("not used".into()))
        }

        async fn get_by_id(&self, _: &str, _: &str) -> ApiResult<ContentNode> {
            Err(ApiError::InvalidRequest("not used".into()))
        }

        async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
            let delay = if request.query == "slow" || (request.query == "mfa" && request.page == 1) {
                Duration::from_secs(2)
            } else {
                Duration::from_millis(10)
            };
            sleep(delay).await;
            Ok(SearchResponse {
                all_results: vec![hit(
                    &format!("p{}", request.page),
                    EntityType::News,
                    &request.query,
                )],
                results_by_type: None,
                metadata: SearchMetadata {
                    query: request.query.clone(),
                    total_results: 50,
                    ..SearchMetadata::default()
                },
                pagination: content::Pagination::new(request.page, request.page_size, 50),
            })
        }

        async fn health(&self) -> ApiResult<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_page_response_is_ignored() {
        let session = SearchSession::new(SearchAggregator::new(Arc::new(DelayedSearch)));
        session.state.send_modify(|state| state.query = "mfa".to_string());

        let (first, second) = tokio::join!(session.set_page(1), async {
            sleep(Duration::from_millis(100)).await;
            session.set_page(2).await
        });
        first.unwrap();
        second.unwrap();

        let state = session.state();
        assert_eq!(state.page, 2);
        assert_eq!(state.visible_results()[0].id, "p2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_query_response_is_ignored() {
        let session = SearchSession::new(SearchAggregator::new(Arc::new(DelayedSearch)))
            .with_debouncer(Debouncer::new(Duration::from_millis(400)));

        let (slow, fast) = tokio::join!(session.type_query("slow"), async {
            // the slow query is already in flight by now
            sleep(Duration::from_millis(500)).await;
            session.type_query("fast").await
        });
        slow.unwrap();
        fast.unwrap();

        let state = session.state();
        assert_eq!(state.query, "fast");
        assert_eq!(state.visible_results()[0].title_en.as_deref(), Some("fast"));
    }
}
