use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::viewer::Viewer;
use crate::presentation::AppState;
use crate::presentation::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Anonymous unless an authentication middleware recorded a user.
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthenticatedUser>()
            .map_or(Viewer::Anonymous, |user| Viewer::User(user.user_id)))
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.ok_or(AppError::Unauthorized)?;
    let user = authenticate(&state, token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// No header means an anonymous viewer; a malformed or invalid token is still 401.
pub(crate) async fn optional_jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(request.headers())? {
        let user = authenticate(&state, token)?;
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedUser, AppError> {
    let claims = state
        .jwt
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;
    Ok(AuthenticatedUser {
        user_id: claims.user_id,
    })
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_header = value.to_str().map_err(|_| AppError::Unauthorized)?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next().ok_or(AppError::Unauthorized)?;
    let token = parts.next().ok_or(AppError::Unauthorized)?;
    if parts.next().is_some() {
        return Err(AppError::Unauthorized);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized);
    }
    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::bearer_token;
    use crate::presentation::app_error::AppError;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header"),
        );
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert!(matches!(bearer_token(&HeaderMap::new()), Ok(None)));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let headers = headers("bEaReR abc.def.ghi");
        assert_eq!(bearer_token(&headers).ok().flatten(), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn extra_segments_are_rejected() {
        assert!(matches!(
            bearer_token(&headers("Bearer a b")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer")),
            Err(AppError::Unauthorized)
        ));
    }
}
