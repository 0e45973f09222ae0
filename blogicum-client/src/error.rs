use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blogicum-client`.
pub enum BlogClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует или некорректен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Операция над чужим постом или комментарием.
    #[error("forbidden")]
    Forbidden,

    /// Ресурс не найден или скрыт от текущего пользователя.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос, конфликт или бизнес-ошибка валидации.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `blogicum-client`.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::BlogClientError;

    #[test]
    fn forbidden_is_distinct_from_unauthorized() {
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::FORBIDDEN, None),
            BlogClientError::Forbidden
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::UNAUTHORIZED, None),
            BlogClientError::Unauthorized
        ));
    }

    #[test]
    fn conflict_keeps_server_message() {
        let err = BlogClientError::from_http_status(
            StatusCode::CONFLICT,
            Some("resource already exists: username".to_string()),
        );
        match err {
            BlogClientError::InvalidRequest(message) => {
                assert_eq!(message, "resource already exists: username")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_message_falls_back_to_status() {
        let err = BlogClientError::from_http_status(StatusCode::BAD_REQUEST, None);
        assert_eq!(err.to_string(), "invalid request: http status 400 Bad Request");
    }
}
