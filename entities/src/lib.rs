//! Searchable entity types and the shape of search responses.

pub mod entity_type;
pub mod error;
pub mod search;

pub use entity_type::EntityType;
pub use error::{EntitiesError, Result};
pub use search::{Facet, SearchMetadata, SearchResponse, SearchResult};

// Re-export the pagination model shared with content listings
pub use content::Pagination;
