use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("forbidden")]
    Forbidden,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    /// Same value for an absent post and a post the viewer may not see.
    pub(crate) fn post_not_found(id: i64) -> Self {
        Self::NotFound(format!("post id: {id}"))
    }

    pub(crate) fn comment_not_found(id: i64) -> Self {
        Self::NotFound(format!("comment id: {id}"))
    }

    pub(crate) fn validation(field: &'static str, message: &'static str) -> Self {
        Self::Validation { field, message }
    }
}
