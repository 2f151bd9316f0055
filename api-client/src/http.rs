use async_trait::async_trait;
use content::{ContentNode, Page, Pagination};
use entities::SearchResponse;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::{
    config::ApiConfig,
    error::{ApiError, ApiErrorResponse, ApiResult},
    ContentApi, ListRequest, ParentRef, SearchRequest,
};

/// [`ContentApi`] over the backend's JSON/HTTP endpoints:
///
/// - `GET {base}/{collection}?page=&pageSize=&query=`
/// - `GET {base}/{collection}/by-parent/{parentId}?page=&pageSize=&query=`
/// - `GET {base}/{collection}/{id}`
/// - `GET {base}/search?query=&page=&pageSize=`
/// - `GET {base}/health`
#[derive(Debug, Clone)]
pub struct HttpContentApi {
    client: reqwest::Client,
    base: Url,
    config: ApiConfig,
}

impl HttpContentApi {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        config.validate()?;
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("amn-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Base URL joined with path segments, each percent-encoded
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(
                segments
                    .into_iter()
                    .flat_map(|s| s.split('/'))
                    .filter(|s| !s.is_empty()),
            );
        Ok(url)
    }

    /// GET with the configured retry policy
    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> ApiResult<T> {
        let mut attempt = 0;
        loop {
            match self.get_once(&url, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff_for(attempt);
                    warn!(
                        "GET {} failed ({}), retry {}/{} in {:?}",
                        url.path(),
                        e,
                        attempt,
                        self.config.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if matches!(e, ApiError::NotFound(_)) {
                        debug!("GET {} -> not found", url.path());
                    } else {
                        error!("GET {} failed: {}", url.path(), e);
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url, query: &[(&str, String)]) -> ApiResult<T> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{}: {}", url.path(), e)))
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn list(&self, request: &ListRequest) -> ApiResult<Page<ContentNode>> {
        Pagination::check_request(request.page, request.page_size)?;

        let url = match &request.parent {
            ParentRef::Root => self.endpoint([request.collection.as_str()])?,
            ParentRef::Id(id) => {
                self.endpoint([request.collection.as_str(), "by-parent", id.as_str()])?
            }
            ParentRef::Unresolved => {
                return Err(ApiError::InvalidRequest(format!(
                    "cannot list {} before its parent is resolved",
                    request.collection
                )))
            }
        };

        let mut query = vec![
            ("page", request.page.to_string()),
            ("pageSize", request.page_size.to_string()),
        ];
        if let Some(q) = &request.query {
            query.push(("query", q.clone()));
        }

        let mut page: Page<ContentNode> = self.get_json(url, &query).await?;
        page.pagination = page.pagination.normalized(request.page_size);
        Ok(page)
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> ApiResult<ContentNode> {
        let url = self.endpoint([collection, id])?;
        self.get_json(url, &[]).await
    }

    async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        Pagination::check_request(request.page, request.page_size)?;

        let url = self.endpoint(["search"])?;
        let query = [
            ("query", request.query.clone()),
            ("page", request.page.to_string()),
            ("pageSize", request.page_size.to_string()),
        ];
        let response: SearchResponse = self.get_json(url, &query).await?;
        Ok(response.normalized(request.page_size))
    }

    async fn health(&self) -> ApiResult<()> {
        // Health bodies vary between plain text and JSON, only the status matters
        let url = self.endpoint(["health"])?;
        let status = self.client.get(url).send().await?.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Http {
                status: status.as_u16(),
                message: "backend reports unhealthy".to_string(),
            })
        }
    }
}
