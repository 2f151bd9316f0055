//! Multi-entity search for the portal.
//!
//! [`SearchAggregator`] runs one query against the backend and hands back a
//! normalized [`entities::SearchResponse`]. [`SearchSession`] drives a search
//! page on top of it: debounced typing, paging, and client-side type filters
//! that never touch the network.

pub mod aggregator;
pub mod debounce;
pub mod error;
pub mod session;

pub use aggregator::SearchAggregator;
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use error::SearchError;
pub use session::{SearchSession, SearchState, DEFAULT_PAGE_SIZE};

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
