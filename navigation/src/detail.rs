//! Detail pages: resolve `/{domain}/{slug}/{slug}/...` to a content node by
//! walking the domain's tree one level at a time.

use api_client::{ApiError, ContentApi, ListRequest, ParentRef};
use content::{
    resolve_by_slug, BreadcrumbBuilder, BreadcrumbItem, ContentNode, Crumb, MediaBlock, RoutePath,
    Sluggable,
};
use fields::{Language, LocalizedText, TextDirection};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{error::NavigationError, list::ListParams, Result};

/// Sibling page size used while resolving ancestors
pub const DEFAULT_ANCESTOR_PAGE_SIZE: u32 = 100;

/// A content domain and the collection behind each level of its tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainTree {
    pub id: String,
    pub title: LocalizedText,
    /// Collections from the root level down
    pub levels: Vec<String>,
}

impl DomainTree {
    pub fn new(id: impl Into<String>, title: LocalizedText, levels: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title,
            levels,
        }
    }

    /// Built-in domains used when no configuration names any
    pub fn defaults() -> Vec<DomainTree> {
        vec![
            DomainTree::new(
                "standards",
                LocalizedText::new("المعايير", "Standards"),
                vec![
                    "standards/categories".into(),
                    "standards/subcategories".into(),
                    "standards/controls".into(),
                    "standards/control-steps".into(),
                ],
            ),
            DomainTree::new(
                "procedures",
                LocalizedText::new("الإجراءات", "Procedures"),
                vec![
                    "procedures".into(),
                    "procedures/controls".into(),
                    "procedures/safeguards".into(),
                    "procedures/techniques".into(),
                    "procedures/implementation-steps".into(),
                ],
            ),
        ]
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn collection(&self, level: usize) -> Option<&str> {
        self.levels.get(level).map(String::as_str)
    }

    pub fn root(&self) -> RoutePath {
        RoutePath::new(self.id.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() || self.id.contains('/') {
            return Err(NavigationError::InvalidDomain(format!(
                "'{}' is not a valid domain id",
                self.id
            )));
        }
        if self.levels.is_empty() {
            return Err(NavigationError::InvalidDomain(format!(
                "{} has no levels",
                self.id
            )));
        }
        if let Some(blank) = self.levels.iter().position(|l| l.trim().is_empty()) {
            return Err(NavigationError::InvalidDomain(format!(
                "{} level {} has no collection",
                self.id, blank
            )));
        }
        Ok(())
    }
}

/// Find a domain by id
pub fn find_domain<'a>(domains: &'a [DomainTree], id: &str) -> Result<&'a DomainTree> {
    domains
        .iter()
        .find(|d| d.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| NavigationError::UnknownDomain(id.to_string()))
}

/// Public site settings used for canonical links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub name: LocalizedText,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            name: LocalizedText::new("بوابة أمن", "Amn Portal"),
        }
    }
}

impl SiteConfig {
    /// Absolute URL of a route on the public site
    pub fn absolute_url(&self, route: &RoutePath) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route.href())
    }
}

/// Cleans backend HTML before it is shown
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Reduces HTML to plain text, for terminals and previews
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSanitizer;

impl HtmlSanitizer for PlainTextSanitizer {
    fn sanitize(&self, html: &str) -> String {
        content::strip_html_tags(html)
    }
}

/// A node matched on the path, with its canonical route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNode {
    pub node: ContentNode,
    pub route: RoutePath,
}

/// Everything a detail page needs once the path is resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDetail {
    pub domain: DomainTree,
    pub ancestors: Vec<ResolvedNode>,
    pub node: ContentNode,
    pub route: RoutePath,
}

impl ResolvedDetail {
    pub fn level(&self) -> usize {
        self.ancestors.len()
    }

    /// Collection holding this node's children, if the tree goes deeper
    pub fn child_collection(&self) -> Option<&str> {
        self.domain.collection(self.level() + 1)
    }

    /// Listing parameters for this node's children
    pub fn child_params(&self) -> Option<ListParams> {
        self.child_collection()?;
        Some(ListParams::new(ParentRef::Id(self.node.id.clone())))
    }

    pub fn breadcrumbs(&self, language: Language) -> Vec<BreadcrumbItem> {
        let mut crumbs = vec![Crumb::resolved(
            self.domain.title.clone(),
            self.domain.root().href(),
        )];
        crumbs.extend(
            self.ancestors
                .iter()
                .map(|a| Crumb::resolved(a.node.name_text(), a.route.href())),
        );
        BreadcrumbBuilder::new(language).build(&crumbs, Some(&self.node.name_text()), false)
    }

    /// Render the page in `language`
    pub fn view(
        &self,
        language: Language,
        sanitizer: &dyn HtmlSanitizer,
        site: &SiteConfig,
    ) -> DetailView {
        let body = self.node.body(language);
        DetailView {
            language,
            direction: language.direction(),
            title: self.node.title(language),
            summary: self.node.summary(language),
            body: if body.is_empty() {
                String::new()
            } else {
                sanitizer.sanitize(&body)
            },
            media: self.node.media(),
            breadcrumbs: self.breadcrumbs(language),
            route: self.route.href(),
            share_url: site.absolute_url(&self.route),
        }
    }
}

/// A detail page ready to display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub language: Language,
    pub direction: TextDirection,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub media: Vec<MediaBlock>,
    pub breadcrumbs: Vec<BreadcrumbItem>,
    pub route: String,
    pub share_url: String,
}

/// Where a detail page is in its resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailState {
    Idle,
    ResolvingAncestors {
        level: usize,
    },
    ResolvingLeaf,
    Ready(Box<ResolvedDetail>),
    NotFound {
        level: usize,
        slug: String,
        back_href: String,
    },
    Error {
        level: usize,
        message: String,
    },
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            DetailState::ResolvingAncestors { .. } | DetailState::ResolvingLeaf
        )
    }
}

#[derive(Debug, Default)]
struct Progress {
    slugs: Vec<String>,
    resolved: Vec<ContentNode>,
}

/// Drives one detail page.
///
/// Each level lists the siblings under the already resolved parent and
/// matches the slug among them. A miss stops the walk with `NotFound`; a
/// failed fetch stops it with `Error` and [`DetailController::retry`] resumes
/// from that level.
pub struct DetailController {
    api: Arc<dyn ContentApi>,
    domain: DomainTree,
    ancestor_page_size: u32,
    fetch_body: bool,
    generation: AtomicU64,
    progress: Mutex<Progress>,
    state: watch::Sender<DetailState>,
}

impl DetailController {
    pub fn new(api: Arc<dyn ContentApi>, domain: DomainTree) -> Self {
        let (state, _) = watch::channel(DetailState::Idle);
        Self {
            api,
            domain,
            ancestor_page_size: DEFAULT_ANCESTOR_PAGE_SIZE,
            fetch_body: true,
            generation: AtomicU64::new(0),
            progress: Mutex::new(Progress::default()),
            state,
        }
    }

    pub fn with_ancestor_page_size(mut self, page_size: u32) -> Self {
        self.ancestor_page_size = page_size.max(1);
        self
    }

    /// Whether a leaf listed without body content is fetched in full before
    /// `Ready`. Off when only the path matters, e.g. to list its children.
    pub fn with_body_fetch(mut self, fetch_body: bool) -> Self {
        self.fetch_body = fetch_body;
        self
    }

    pub fn domain(&self) -> &DomainTree {
        &self.domain
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Resolve a path of slugs below the domain root
    pub async fn resolve(&self, slugs: Vec<String>) -> Result<DetailState> {
        if slugs.is_empty() {
            return Err(NavigationError::EmptyPath);
        }

        info!("Resolving /{}/{}", self.domain.id, slugs.join("/"));
        let generation = {
            let mut progress = self.progress();
            *progress = Progress {
                slugs,
                resolved: Vec::new(),
            };
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        Ok(self.run(generation).await)
    }

    /// Resume after an `Error`, keeping the ancestors already resolved
    pub async fn retry(&self) -> Result<DetailState> {
        if !matches!(*self.state.borrow(), DetailState::Error { .. }) {
            return Err(NavigationError::NothingToRetry);
        }
        let generation = {
            let progress = self.progress();
            debug!("Retrying from level {}", progress.resolved.len());
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        Ok(self.run(generation).await)
    }

    /// Abandon the current resolution; late responses are ignored and a
    /// page still resolving goes back to `Idle`
    pub fn cancel(&self) {
        let generation = {
            let _progress = self.progress();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        self.state.send_if_modified(|state| {
            if !self.is_current(generation) || !state.is_loading() {
                return false;
            }
            debug!("Cancelled while {:?}", state);
            *state = DetailState::Idle;
            true
        });
    }

    /// Breadcrumbs for the current progress: placeholders for levels still
    /// resolving, and the unmatched slug as the last item once the walk stopped
    pub fn breadcrumbs(&self, language: Language) -> Vec<BreadcrumbItem> {
        let state = self.state();
        let progress = self.progress();
        let (depth, current) = match &state {
            DetailState::Ready(detail) => return detail.breadcrumbs(language),
            DetailState::NotFound { level, slug, .. } => {
                (*level, Some(LocalizedText::new(slug.as_str(), slug.as_str())))
            }
            DetailState::Error { level, .. } => (
                *level,
                progress
                    .slugs
                    .get(*level)
                    .map(|slug| LocalizedText::new(slug.as_str(), slug.as_str())),
            ),
            _ => {
                let leaf_level = progress.slugs.len().saturating_sub(1);
                (
                    leaf_level,
                    progress.resolved.get(leaf_level).map(ContentNode::name_text),
                )
            }
        };

        let mut route = self.domain.root();
        let mut crumbs = vec![Crumb::resolved(self.domain.title.clone(), route.href())];
        for level in 0..depth {
            match progress.resolved.get(level) {
                Some(node) => {
                    route = route.child(node.slug());
                    crumbs.push(Crumb::resolved(node.name_text(), route.href()));
                }
                None => crumbs.push(Crumb::Pending),
            }
        }
        BreadcrumbBuilder::new(language).build(&crumbs, current.as_ref(), state.is_loading())
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Publish `state` unless a newer resolution has started, returning
    /// whatever is published afterwards
    fn publish(&self, generation: u64, state: DetailState) -> DetailState {
        let published = self.state.send_if_modified(|current| {
            if !self.is_current(generation) {
                return false;
            }
            *current = state.clone();
            true
        });
        if published {
            state
        } else {
            debug!("Dropping stale {:?}", state);
            self.state()
        }
    }

    fn route_to(&self, nodes: &[ContentNode]) -> RoutePath {
        nodes
            .iter()
            .fold(self.domain.root(), |route, node| route.child(node.slug()))
    }

    async fn run(&self, generation: u64) -> DetailState {
        loop {
            let (level, slug, parent, leaf_level, back_href) = {
                let progress = self.progress();
                if !self.is_current(generation) {
                    return self.state();
                }
                let level = progress.resolved.len();
                if level >= progress.slugs.len() {
                    break;
                }
                let parent = progress
                    .resolved
                    .last()
                    .map(|node| ParentRef::Id(node.id.clone()))
                    .unwrap_or(ParentRef::Root);
                (
                    level,
                    progress.slugs[level].clone(),
                    parent,
                    progress.slugs.len() - 1,
                    self.route_to(&progress.resolved).href(),
                )
            };

            let Some(collection) = self.domain.collection(level) else {
                debug!("/{} has no level {}", self.domain.id, level);
                return self.publish(
                    generation,
                    DetailState::NotFound {
                        level,
                        slug,
                        back_href,
                    },
                );
            };

            let resolving = if level == leaf_level {
                DetailState::ResolvingLeaf
            } else {
                DetailState::ResolvingAncestors { level }
            };
            self.publish(generation, resolving);

            let request = ListRequest::new(collection, parent).page(1, self.ancestor_page_size);
            let siblings = match self.api.list(&request).await {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to list {} at level {}: {}", collection, level, e);
                    return self.publish(
                        generation,
                        DetailState::Error {
                            level,
                            message: e.to_string(),
                        },
                    );
                }
            };
            if siblings.is_truncated() {
                warn!(
                    "{} has {} siblings but only {} were searched for '{}'",
                    collection,
                    siblings.pagination.items_count,
                    siblings.data.len(),
                    slug
                );
            }

            match resolve_by_slug(&siblings.data, &slug) {
                Ok(node) => {
                    let mut progress = self.progress();
                    if !self.is_current(generation) {
                        debug!("Dropping stale siblings of level {}", level);
                        drop(progress);
                        return self.state();
                    }
                    debug!("Level {}: '{}' -> {}", level, slug, node.id);
                    progress.resolved.push(node.clone());
                }
                Err(_) => {
                    info!("No match for '{}' in {} at level {}", slug, collection, level);
                    return self.publish(
                        generation,
                        DetailState::NotFound {
                            level,
                            slug,
                            back_href,
                        },
                    );
                }
            }
        }

        self.finish(generation).await
    }

    /// Fetch the full leaf when its list entry has no body, then publish `Ready`
    async fn finish(&self, generation: u64) -> DetailState {
        let (mut resolved, leaf_slug) = {
            let progress = self.progress();
            if !self.is_current(generation) {
                return self.state();
            }
            (
                progress.resolved.clone(),
                progress.slugs.last().cloned().unwrap_or_default(),
            )
        };
        let Some(mut leaf) = resolved.pop() else {
            return self.state();
        };
        let level = resolved.len();

        if self.fetch_body && !leaf.has_body() {
            if let Some(collection) = self.domain.collection(level) {
                self.publish(generation, DetailState::ResolvingLeaf);
                match self.api.get_by_id(collection, &leaf.id).await {
                    Ok(full) => leaf = full,
                    Err(ApiError::NotFound(_)) => {
                        info!("{} {} is listed but has no page", collection, leaf.id);
                        return self.publish(
                            generation,
                            DetailState::NotFound {
                                level,
                                slug: leaf_slug,
                                back_href: self.route_to(&resolved).href(),
                            },
                        );
                    }
                    Err(e) => {
                        error!("Failed to fetch {} {}: {}", collection, leaf.id, e);
                        return self.publish(
                            generation,
                            DetailState::Error {
                                level,
                                message: e.to_string(),
                            },
                        );
                    }
                }
            }
        }

        let mut route = self.domain.root();
        let ancestors = resolved
            .into_iter()
            .map(|node| {
                route = route.child(node.slug());
                ResolvedNode {
                    node,
                    route: route.clone(),
                }
            })
            .collect();
        let route = route.child(leaf.slug());
        info!("Resolved {}", route);

        self.publish(
            generation,
            DetailState::Ready(Box::new(ResolvedDetail {
                domain: self.domain.clone(),
                ancestors,
                node: leaf,
                route,
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::{ApiCall, ApiResult, InMemoryContentApi, SearchRequest};
    use async_trait::async_trait;
    use content::{ContentError, Page};
    use std::time::Duration;
    use tokio::time::sleep;

    fn tree() -> DomainTree {
        DomainTree::new(
            "standards",
            LocalizedText::new("المعايير", "Standards"),
            vec!["categories".into(), "subcategories".into(), "controls".into()],
        )
    }

    fn api() -> InMemoryContentApi {
        InMemoryContentApi::new()
            .with_children(
                "categories",
                ParentRef::Root,
                vec![ContentNode::new("c1", "الحوكمة").with_name_en("Governance")],
            )
            .with_children(
                "subcategories",
                ParentRef::Id("c1".into()),
                vec![
                    ContentNode::new("s1", "كلمات المرور").with_name_en("Passwords"),
                    ContentNode::new("s2", "النسخ الاحتياطي").with_name_en("Backups"),
                ],
            )
            .with_children(
                "controls",
                ParentRef::Id("s1".into()),
                vec![ContentNode::new("k1", "طول كلمة المرور").with_name_en("Password length")],
            )
            .with_detail(
                "controls",
                ContentNode::new("k1", "طول كلمة المرور")
                    .with_name_en("Password length")
                    .with_content(
                        "<p>استخدم 12 حرفاً على الأقل</p>",
                        "<p>Use at least <b>12</b> characters</p>",
                    ),
            )
    }

    fn slugs(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolves_leaf_and_fetches_body() {
        let api = Arc::new(api());
        let controller = DetailController::new(api.clone(), tree());

        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1", "password-length-k1"]))
            .await
            .unwrap();

        let DetailState::Ready(detail) = state else {
            panic!("expected Ready, got {:?}", state);
        };
        assert_eq!(detail.node.id, "k1");
        assert!(detail.node.has_body());
        assert_eq!(
            detail.route.href(),
            "/standards/governance-c1/passwords-s1/password-length-k1"
        );
        assert!(matches!(
            api.calls().last(),
            Some(ApiCall::GetById { id, .. }) if id == "k1"
        ));
    }

    #[tokio::test]
    async fn test_unknown_slug_stops_the_walk() {
        let api = Arc::new(api());
        let controller = DetailController::new(api.clone(), tree());

        let state = controller
            .resolve(slugs(&["governance-c1", "unknown-slug", "password-length-k1"]))
            .await
            .unwrap();

        assert_eq!(
            state,
            DetailState::NotFound {
                level: 1,
                slug: "unknown-slug".into(),
                back_href: "/standards/governance-c1".into(),
            }
        );
        assert_eq!(api.call_count(), 2);

        let crumbs = controller.breadcrumbs(Language::En);
        let labels: Vec<_> = crumbs.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Standards", "Governance", "unknown-slug"]);
        assert_eq!(crumbs[2].href, None);
    }

    #[tokio::test]
    async fn test_path_deeper_than_tree_is_not_found() {
        let controller = DetailController::new(Arc::new(api()), tree());
        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1", "password-length-k1", "extra"]))
            .await
            .unwrap();
        assert!(matches!(state, DetailState::NotFound { level: 3, .. }));
    }

    #[tokio::test]
    async fn test_empty_path_is_rejected() {
        let controller = DetailController::new(Arc::new(api()), tree());
        assert_eq!(
            controller.resolve(Vec::new()).await,
            Err(NavigationError::EmptyPath)
        );
    }

    #[tokio::test]
    async fn test_retry_resumes_at_failed_level() {
        let api = Arc::new(api());
        api.fail_collection("subcategories", ApiError::Timeout("10s".into()));
        let controller = DetailController::new(api.clone(), tree());

        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1"]))
            .await
            .unwrap();
        assert!(matches!(state, DetailState::Error { level: 1, .. }));
        assert_eq!(api.call_count(), 2);

        api.clear_failure("subcategories");
        let state = controller.retry().await.unwrap();
        assert!(matches!(state, DetailState::Ready(_)));

        let listed: Vec<String> = api
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::List(request) => Some(request.collection),
                _ => None,
            })
            .collect();
        assert_eq!(listed, ["categories", "subcategories", "subcategories"]);
    }

    #[tokio::test]
    async fn test_leaf_missing_on_fetch_is_not_found() {
        let api = Arc::new(api());
        api.fail_detail("controls", "k1", ApiError::NotFound("controls/k1".into()));
        let controller = DetailController::new(api.clone(), tree());

        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1", "password-length-k1"]))
            .await
            .unwrap();

        assert_eq!(
            state,
            DetailState::NotFound {
                level: 2,
                slug: "password-length-k1".into(),
                back_href: "/standards/governance-c1/passwords-s1".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_leaf_fetch_failure_retries_only_the_leaf() {
        let api = Arc::new(api());
        api.fail_detail("controls", "k1", ApiError::Transport("connection reset".into()));
        let controller = DetailController::new(api.clone(), tree());
        let path = slugs(&["governance-c1", "passwords-s1", "password-length-k1"]);

        let state = controller.resolve(path).await.unwrap();
        assert!(matches!(state, DetailState::Error { level: 2, .. }));
        let labels: Vec<_> = controller
            .breadcrumbs(Language::En)
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, ["Standards", "Governance", "Passwords", "password-length-k1"]);

        api.clear_detail_failure("controls", "k1");
        let state = controller.retry().await.unwrap();
        let DetailState::Ready(detail) = state else {
            panic!("expected Ready, got {:?}", state);
        };
        assert!(detail.node.has_body());

        let calls = api.calls();
        let lists = calls
            .iter()
            .filter(|call| matches!(call, ApiCall::List(_)))
            .count();
        let fetches = calls
            .iter()
            .filter(|call| matches!(call, ApiCall::GetById { id, .. } if id == "k1"))
            .count();
        assert_eq!(lists, 3);
        assert_eq!(fetches, 2);
    }

    /// Answers listings under one parent slowly and everything else quickly
    struct SlowParent {
        inner: InMemoryContentApi,
        slow: ParentRef,
    }

    #[async_trait]
    impl ContentApi for SlowParent {
        async fn list(&self, request: &ListRequest) -> ApiResult<Page<ContentNode>> {
            let delay = if request.parent == self.slow { 2000 } else { 10 };
            sleep(Duration::from_millis(delay)).await;
            self.inner.list(request).await
        }

        async fn get_by_id(&self, collection: &str, id: &str) -> ApiResult<ContentNode> {
            self.inner.get_by_id(collection, id).await
        }

        async fn search(&self, request: &SearchRequest) -> ApiResult<entities::SearchResponse> {
            self.inner.search(request).await
        }

        async fn health(&self) -> ApiResult<()> {
            self.inner.health().await
        }
    }

    fn slow_under(parent: &str) -> Arc<SlowParent> {
        let inner = api()
            .with_children(
                "categories",
                ParentRef::Root,
                vec![
                    ContentNode::new("c1", "الحوكمة").with_name_en("Governance"),
                    ContentNode::new("c2", "المخاطر").with_name_en("Risk"),
                ],
            )
            .with_children(
                "subcategories",
                ParentRef::Id("c2".into()),
                vec![ContentNode::new("s3", "الأصول").with_name_en("Assets")],
            );
        Arc::new(SlowParent {
            inner,
            slow: ParentRef::Id(parent.into()),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_resolution_is_ignored() {
        let controller = DetailController::new(slow_under("c1"), tree());

        let (first, second) = tokio::join!(
            controller.resolve(slugs(&["governance-c1", "passwords-s1"])),
            async {
                sleep(Duration::from_millis(100)).await;
                controller.resolve(slugs(&["risk-c2", "assets-s3"])).await
            }
        );

        for state in [first.unwrap(), second.unwrap(), controller.state()] {
            let DetailState::Ready(detail) = state else {
                panic!("expected Ready, got {:?}", state);
            };
            assert_eq!(detail.node.id, "s3");
            assert_eq!(detail.route.href(), "/standards/risk-c2/assets-s3");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_settles_resolving_page() {
        let controller = DetailController::new(slow_under("c1"), tree());

        let (result, _) = tokio::join!(
            controller.resolve(slugs(&["governance-c1", "passwords-s1"])),
            async {
                sleep(Duration::from_millis(100)).await;
                assert_eq!(controller.state(), DetailState::ResolvingLeaf);
                controller.cancel();
                assert_eq!(controller.state(), DetailState::Idle);
            }
        );

        assert_eq!(result.unwrap(), DetailState::Idle);
        assert!(!controller.state().is_loading());
        assert_eq!(controller.retry().await, Err(NavigationError::NothingToRetry));
    }

    #[tokio::test]
    async fn test_cancel_keeps_a_ready_page() {
        let controller = DetailController::new(Arc::new(api()), tree());
        controller
            .resolve(slugs(&["governance-c1", "passwords-s1"]))
            .await
            .unwrap();

        controller.cancel();
        assert!(matches!(controller.state(), DetailState::Ready(_)));
    }

    #[tokio::test]
    async fn test_path_only_resolution_skips_body_fetch() {
        let api = Arc::new(api());
        api.fail_detail("subcategories", "s1", ApiError::NotFound("subcategories/s1".into()));
        let controller = DetailController::new(api.clone(), tree()).with_body_fetch(false);

        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1"]))
            .await
            .unwrap();

        let DetailState::Ready(detail) = state else {
            panic!("expected Ready, got {:?}", state);
        };
        assert_eq!(detail.route.href(), "/standards/governance-c1/passwords-s1");
        assert!(api
            .calls()
            .iter()
            .all(|call| matches!(call, ApiCall::List(_))));
    }

    #[tokio::test]
    async fn test_retry_without_error_is_rejected() {
        let controller = DetailController::new(Arc::new(api()), tree());
        assert_eq!(controller.retry().await, Err(NavigationError::NothingToRetry));
    }

    #[tokio::test]
    async fn test_view_renders_localized_page() {
        let controller = DetailController::new(Arc::new(api()), tree());
        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1", "password-length-k1"]))
            .await
            .unwrap();
        let DetailState::Ready(detail) = state else {
            panic!("expected Ready");
        };

        let site = SiteConfig {
            base_url: "https://amn.example.org/".into(),
            ..SiteConfig::default()
        };
        let view = detail.view(Language::En, &PlainTextSanitizer, &site);
        assert_eq!(view.title, "Password length");
        assert_eq!(view.body, "Use at least 12 characters");
        assert_eq!(view.direction, TextDirection::Ltr);
        assert!(view.media.is_empty());
        assert_eq!(
            view.share_url,
            "https://amn.example.org/standards/governance-c1/passwords-s1/password-length-k1"
        );

        let labels: Vec<_> = view.breadcrumbs.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Standards", "Governance", "Passwords", "Password length"]);
        assert_eq!(view.breadcrumbs.last().unwrap().href, None);

        let arabic = detail.view(Language::Ar, &PlainTextSanitizer, &site);
        assert_eq!(arabic.title, "طول كلمة المرور");
        assert_eq!(arabic.direction, TextDirection::Rtl);
    }

    #[tokio::test]
    async fn test_child_params_point_at_next_level() {
        let controller = DetailController::new(Arc::new(api()), tree());
        let state = controller
            .resolve(slugs(&["governance-c1", "passwords-s1"]))
            .await
            .unwrap();
        let DetailState::Ready(detail) = state else {
            panic!("expected Ready");
        };
        assert_eq!(detail.child_collection(), Some("controls"));
        assert_eq!(
            detail.child_params().map(|p| p.parent),
            Some(ParentRef::Id("s1".into()))
        );
    }

    #[tokio::test]
    async fn test_breadcrumbs_while_resolving() {
        let controller = DetailController::new(Arc::new(api()), tree());
        *controller.progress() = Progress {
            slugs: slugs(&["governance-c1", "passwords-s1", "password-length-k1"]),
            resolved: vec![ContentNode::new("c1", "الحوكمة").with_name_en("Governance")],
        };
        controller
            .state
            .send_replace(DetailState::ResolvingAncestors { level: 1 });

        let crumbs = controller.breadcrumbs(Language::En);
        let labels: Vec<_> = crumbs.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Standards", "Governance", "Loading...", "Loading..."]);
        assert_eq!(crumbs[1].href.as_deref(), Some("/standards/governance-c1"));
        assert_eq!(crumbs[2].href, None);
        assert_eq!(crumbs[3].href, None);
    }

    #[test]
    fn test_domain_validation() {
        assert!(tree().validate().is_ok());
        for domain in DomainTree::defaults() {
            assert!(domain.validate().is_ok());
        }
        let empty = DomainTree::new("news", LocalizedText::new("الأخبار", "News"), Vec::new());
        assert!(matches!(
            empty.validate(),
            Err(NavigationError::InvalidDomain(_))
        ));
        assert_eq!(
            find_domain(&DomainTree::defaults(), "Procedures").map(|d| d.depth()),
            Ok(5)
        );
        assert!(find_domain(&[], "standards").is_err());
    }

    #[test]
    fn test_slug_error_converts() {
        let err: NavigationError = ContentError::NotFound("x".into()).into();
        assert!(matches!(err, NavigationError::Content(_)));
        assert_eq!(err.clone(), err);
    }
}
