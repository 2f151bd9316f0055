//! # Content Crate
//!
//! Shared content-shaping logic for the Amn portal. Every listing and detail
//! page walks the same kind of tree (category → subcategory → control → step,
//! procedure → control → safeguard → technique → implementation step), so the
//! pieces they have in common live here:
//!
//! - **Content nodes**: the generic tree entity with bilingual fields and media
//! - **Slugs**: stable, id-suffixed URL segments and slug → node resolution
//! - **Pagination**: page arithmetic with normalized backend metadata
//! - **Breadcrumbs**: incremental navigation trails
//! - **Routes**: `/{domain}/{slug}/...` paths
//!
//! ## Usage
//!
//! ```rust
//! use content::{resolve_by_slug, ContentNode, Sluggable};
//!
//! let siblings = vec![
//!     ContentNode::new("s1", "كلمات المرور").with_name_en("Passwords"),
//!     ContentNode::new("s2", "النسخ الاحتياطي").with_name_en("Backups"),
//! ];
//!
//! assert_eq!(siblings[0].slug(), "passwords-s1");
//! let found = resolve_by_slug(&siblings, "backups-s2").unwrap();
//! assert_eq!(found.id, "s2");
//! ```

pub mod breadcrumb;
pub mod error;
pub mod node;
pub mod pagination;
pub mod route;
pub mod slug;
pub mod utils;

pub use breadcrumb::{BreadcrumbBuilder, BreadcrumbItem, Crumb};
pub use error::ContentError;
pub use node::{sort_siblings, ContentNode, MediaBlock};
pub use pagination::{Page, Pagination};
pub use route::RoutePath;
pub use slug::{resolve_by_slug, slug_has_id, slugify, Sluggable};
pub use utils::{extract_summary, strip_html_tags, truncate_with_ellipsis};

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
