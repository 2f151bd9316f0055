use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldsError>;

#[derive(Error, Debug)]
pub enum FieldsError {
    #[error("Form validation failed: {0} field(s) rejected")]
    Validation(usize),

    #[error("Invalid value: {0}")]
    InvalidType(String),

    #[error("Invalid form definition: {0}")]
    InvalidDefinition(String),
}
