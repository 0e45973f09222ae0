use crate::domain::error::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                DomainError::Unexpected(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                ),
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::AppError;
    use crate::domain::error::DomainError;

    fn status(err: AppError) -> StatusCode {
        err.status_and_message().0
    }

    #[test]
    fn hidden_and_missing_posts_share_not_found() {
        assert_eq!(
            status(AppError::Domain(DomainError::post_not_found(1))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn ownership_violation_is_forbidden() {
        assert_eq!(
            status(AppError::Domain(DomainError::Forbidden)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn unexpected_errors_do_not_leak_details() {
        let err = AppError::Domain(DomainError::Unexpected("db password wrong".to_string()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal error");
    }

    #[test]
    fn other_domain_errors_map_to_client_statuses() {
        assert_eq!(
            status(AppError::Domain(DomainError::validation("title", "bad"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::Domain(DomainError::AlreadyExists("email".to_string()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(AppError::Domain(DomainError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
    }
}
