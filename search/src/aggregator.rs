use api_client::{ContentApi, SearchRequest};
use content::Pagination;
use entities::SearchResponse;
use std::sync::Arc;
use tracing::{debug, info};

use crate::Result;

/// Runs multi-entity searches against the backend
#[derive(Clone)]
pub struct SearchAggregator {
    api: Arc<dyn ContentApi>,
}

impl SearchAggregator {
    pub fn new(api: Arc<dyn ContentApi>) -> Self {
        Self { api }
    }

    /// One page of results for `query`.
    ///
    /// A blank query returns an empty response without calling the backend.
    /// The response is normalized so `resultsByType` always partitions
    /// `allResults`.
    pub async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SearchResponse> {
        Pagination::check_request(page, page_size)?;

        let query = query.trim();
        if query.is_empty() {
            debug!("Blank search query, skipping backend call");
            return Ok(SearchResponse::empty(query, page_size));
        }

        let request = SearchRequest {
            query: query.to_string(),
            page,
            page_size,
        };
        let response = self.api.search(&request).await?.normalized(page_size);
        info!(
            "Search '{}' page {}: {} results on page, {} total",
            query,
            response.pagination.current_page,
            response.all_results.len(),
            response.metadata.total_results
        );
        Ok(response)
    }
}
