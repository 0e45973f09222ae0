use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{UpdateProfileRequest, User};
use crate::domain::viewer::Viewer;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::auth::UserDto;
use crate::presentation::handlers::pagination::{PaginationQuery, PostPageDto};
use crate::presentation::middleware::auth::AuthenticatedUser;

/// Public view of a user; the email is left out.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PublicUserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    pub(crate) user: PublicUserDto,
    pub(crate) posts: PostPageDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub(crate) last_name: String,
}

impl From<User> for PublicUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/profiles/{username}",
    tag = "profiles",
    security(
        (),
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Username"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Profile with the posts visible to the viewer", body = ProfileDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<(StatusCode, Json<ProfileDto>)> {
    query.validate()?;
    let pagination = query.into_pagination(state.posts_per_page);

    let profile = state
        .profile_service
        .get_profile(&viewer, &username, pagination)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ProfileDto {
            user: profile.user.into(),
            posts: profile.posts.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username or email taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;
    let req = UpdateProfileRequest {
        username: dto.username,
        email: dto.email,
        first_name: dto.first_name,
        last_name: dto.last_name,
    };

    let user = state
        .profile_service
        .update_profile(auth.user_id, req)
        .await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}
