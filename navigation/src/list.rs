use api_client::{ContentApi, ListRequest, ParentRef};
use content::{ContentNode, Pagination};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::Result;

pub const DEFAULT_LIST_PAGE_SIZE: u32 = 10;

/// What to list: one page of the children of `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub parent: ParentRef,
    pub page: u32,
    pub page_size: u32,
    pub query: Option<String>,
}

impl ListParams {
    pub fn new(parent: ParentRef) -> Self {
        Self {
            parent,
            page: 1,
            page_size: DEFAULT_LIST_PAGE_SIZE,
            query: None,
        }
    }

    /// Children of a node whose id may not be known yet
    pub fn for_parent_id(parent_id: Option<&str>) -> Self {
        Self::new(ParentRef::from_option(parent_id))
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn query(mut self, query: Option<impl Into<String>>) -> Self {
        self.query = query.map(Into::into);
        self
    }
}

/// Observable state of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState {
    pub items: Vec<ContentNode>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    #[serde(skip)]
    pub parent: ParentRef,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: Pagination::empty(DEFAULT_LIST_PAGE_SIZE),
            parent: ParentRef::Unresolved,
        }
    }
}

/// Paginated, searchable listing of the children of one parent.
///
/// Every load is tagged with a generation number and only the latest one
/// may write the state, so a slow response for an old page or parent never
/// overwrites newer data.
pub struct ListByParent {
    api: Arc<dyn ContentApi>,
    collection: String,
    generation: AtomicU64,
    last_params: Mutex<Option<ListParams>>,
    state: watch::Sender<ListState>,
}

impl ListByParent {
    pub fn new(api: Arc<dyn ContentApi>, collection: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            api,
            collection: collection.into(),
            generation: AtomicU64::new(0),
            last_params: Mutex::new(None),
            state,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    /// Fetch one page for `params`.
    ///
    /// Nothing is requested while the parent is unresolved. On failure the
    /// error is both returned and stored; items stay as they were unless the
    /// parent changed.
    pub async fn load(&self, params: ListParams) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .last_params
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(params.clone());

        if !params.parent.is_resolved() {
            debug!("{}: parent not resolved yet, nothing to fetch", self.collection);
            self.update(generation, |state| {
                state.items.clear();
                state.loading = false;
                state.error = None;
                state.pagination = Pagination::empty(params.page_size);
                state.parent = ParentRef::Unresolved;
            });
            return Ok(());
        }

        self.update(generation, |state| {
            if state.parent != params.parent {
                state.items.clear();
                state.pagination = Pagination::empty(params.page_size);
                state.parent = params.parent.clone();
            }
            state.loading = true;
            state.error = None;
        });

        let request = ListRequest::new(self.collection.as_str(), params.parent.clone())
            .page(params.page, params.page_size)
            .query(params.query.clone());
        let result = self.api.list(&request).await;

        match result {
            Ok(page) => {
                let count = page.data.len();
                let current_page = page.pagination.current_page;
                let written = self.update(generation, |state| {
                    state.items = page.data;
                    state.pagination = page.pagination;
                    state.loading = false;
                });
                if written {
                    debug!(
                        "{}: loaded {} items (page {})",
                        self.collection, count, current_page
                    );
                } else {
                    debug!(
                        "{}: dropping stale page {} for {:?}",
                        self.collection, params.page, params.parent
                    );
                }
                Ok(())
            }
            Err(e) => {
                let written = self.update(generation, |state| {
                    state.error = Some(e.to_string());
                    state.loading = false;
                });
                if !written {
                    debug!("{}: ignoring stale failure: {}", self.collection, e);
                    return Ok(());
                }
                warn!("{}: failed to load page {}: {}", self.collection, params.page, e);
                Err(e.into())
            }
        }
    }

    /// Apply `change` only while `generation` is the latest load; the check
    /// runs under the state lock so a newer load cannot interleave
    fn update(&self, generation: u64, change: impl FnOnce(&mut ListState)) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            change(state);
            true
        })
    }

    /// Repeat the last load
    pub async fn refetch(&self) -> Result<()> {
        let params = self
            .last_params
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match params {
            Some(params) => self.load(params).await,
            None => Ok(()),
        }
    }

    /// Abandon the in-flight load; its response will be ignored
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }
}
