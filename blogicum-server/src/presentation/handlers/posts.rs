use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::post::{CreatePostRequest, Post, PostListItem, UpdatePostRequest};
use crate::domain::taxonomy::{Category, Location};
use crate::domain::user::Author;
use crate::domain::viewer::Viewer;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::comments::CommentDto;
use crate::presentation::handlers::pagination::{PaginationQuery, PostPageDto};
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    #[validate(length(max = 512))]
    pub(crate) image: Option<String>,
    /// Defaults to the time of the request; a future date schedules the post.
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: Option<bool>,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 256))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) text: String,
    #[validate(length(max = 512))]
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthorDto {
    pub(crate) id: i64,
    pub(crate) username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LocationDto {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author: AuthorDto,
    pub(crate) category: CategoryDto,
    pub(crate) location: Option<LocationDto>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostListItemDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) comment_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            username: author.username,
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
            slug: category.slug,
            description: category.description,
        }
    }
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            image: post.image,
            pub_date: post.pub_date,
            is_published: post.is_published,
            author: post.author.into(),
            category: post.category.into(),
            location: post.location.map(LocationDto::from),
            created_at: post.created_at,
        }
    }
}

impl From<PostListItem> for PostListItemDto {
    fn from(item: PostListItem) -> Self {
        Self {
            post: item.post.into(),
            comment_count: item.comment_count,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Live posts, newest first", body = PostPageDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<(StatusCode, Json<PostPageDto>)> {
    query.validate()?;
    let pagination = query.into_pagination(state.posts_per_page);

    let page = state.blog_service.list_index(pagination).await?;

    Ok((StatusCode::OK, Json(PostPageDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        (),
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Post not found or not visible"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostDetailDto>)> {
    let post = state.blog_service.get_post(&viewer, id).await?;
    let comments = state.comment_service.comments_for(&post).await?;

    Ok((
        StatusCode::OK,
        Json(PostDetailDto {
            post: post.into(),
            comments: comments.into_iter().map(CommentDto::from).collect(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        text: dto.text,
        image: dto.image,
        pub_date: dto.pub_date,
        is_published: dto.is_published,
        category_id: dto.category_id,
        location_id: dto.location_id,
    };

    let post = state.blog_service.create_post(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        text: dto.text,
        image: dto.image,
        pub_date: dto.pub_date,
        is_published: dto.is_published,
        category_id: dto.category_id,
        location_id: dto.location_id,
    };

    let post = state
        .blog_service
        .update_post(auth.user_id, id, req)
        .await?;
    Ok((StatusCode::OK, Json(PostDto::from(post))))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
