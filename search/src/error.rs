use api_client::ApiError;
use content::ContentError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Content(#[from] ContentError),
}
