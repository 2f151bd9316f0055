use api_client::ApiError;
use content::ContentError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Invalid domain definition: {0}")]
    InvalidDomain(String),

    #[error("A detail path needs at least one slug")]
    EmptyPath,

    #[error("Nothing to retry")]
    NothingToRetry,

    #[error("Return URL must be a site-relative path: {0}")]
    InvalidReturnUrl(String),
}
