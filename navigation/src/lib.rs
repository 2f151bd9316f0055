//! # Navigation Crate
//!
//! Page controllers for the portal's content trees:
//!
//! - [`ListByParent`]: paginated listing of a node's children that never
//!   shows data for a superseded page or parent
//! - [`DetailController`]: resolves `/{domain}/{slug}/...` level by level
//!   into a [`ResolvedDetail`], with `NotFound`/`Error` states and retry
//! - [`SessionStore`]: the post-login return URL
//!
//! Controllers publish their state through `tokio::sync::watch` channels;
//! `state()` takes a snapshot and `subscribe()` follows changes.

pub mod detail;
pub mod error;
pub mod list;
pub mod session;

pub use detail::{
    find_domain, DetailController, DetailState, DetailView, DomainTree, HtmlSanitizer,
    PlainTextSanitizer, ResolvedDetail, ResolvedNode, SiteConfig, DEFAULT_ANCESTOR_PAGE_SIZE,
};
pub use error::NavigationError;
pub use list::{ListByParent, ListParams, ListState, DEFAULT_LIST_PAGE_SIZE};
pub use session::{SessionStore, RETURN_URL_KEY};

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
