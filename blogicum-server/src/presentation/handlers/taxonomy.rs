use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::pagination::{PaginationQuery, PostPageDto};
use crate::presentation::handlers::posts::{CategoryDto, LocationDto};

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryPostsDto {
    pub(crate) category: CategoryDto,
    #[serde(flatten)]
    pub(crate) page: PostPageDto,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "taxonomy",
    responses(
        (status = 200, description = "Published categories", body = [CategoryDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<CategoryDto>>)> {
    let categories = state.blog_service.list_categories().await?;
    Ok((
        StatusCode::OK,
        Json(categories.into_iter().map(CategoryDto::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}/posts",
    tag = "taxonomy",
    params(
        ("slug" = String, Path, description = "Category slug"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Live posts of the category", body = CategoryPostsDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<(StatusCode, Json<CategoryPostsDto>)> {
    query.validate()?;
    let pagination = query.into_pagination(state.posts_per_page);

    let (category, page) = state.blog_service.list_category(&slug, pagination).await?;

    Ok((
        StatusCode::OK,
        Json(CategoryPostsDto {
            category: category.into(),
            page: page.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "taxonomy",
    responses(
        (status = 200, description = "Published locations", body = [LocationDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_locations(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<LocationDto>>)> {
    let locations = state.blog_service.list_locations().await?;
    Ok((
        StatusCode::OK,
        Json(locations.into_iter().map(LocationDto::from).collect()),
    ))
}
