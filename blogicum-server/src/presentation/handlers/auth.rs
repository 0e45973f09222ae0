use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::auth_service::AuthResult;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;

/// New account. Names are optional and may be filled in later via the profile.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 3, max = 64))]
    #[schema(example = "anna")]
    pub(crate) username: String,
    #[validate(email)]
    #[schema(example = "anna@example.com")]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) last_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    /// HS256 bearer token for the `Authorization` header.
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

/// The caller's own account, email included.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

impl From<AuthResult> for AuthResponseDto {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            user: result.user.into(),
        }
    }
}

impl From<RegisterDto> for RegisterRequest {
    fn from(dto: RegisterDto) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            password: dto.password,
            first_name: dto.first_name,
            last_name: dto.last_name,
        }
    }
}

impl From<LoginDto> for LoginRequest {
    fn from(dto: LoginDto) -> Self {
        Self {
            username: dto.username,
            password: dto.password,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created, token issued", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;
    let result = state.auth_service.register(dto.into()).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Token issued", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;
    let result = state.auth_service.login(dto.into()).await?;
    Ok((StatusCode::OK, Json(result.into())))
}
