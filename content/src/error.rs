//! Error types for content operations

use thiserror::Error;

/// Errors that can occur while shaping content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// No sibling matched the slug taken from the route
    #[error("No content matches slug '{0}'")]
    NotFound(String),

    /// A route path could not be parsed
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Pagination arguments out of range
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}
