use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::handlers::comments::{CommentBodyDto, CommentDto};
use crate::presentation::handlers::pagination::PostPageDto;
use crate::presentation::handlers::posts::{
    AuthorDto, CategoryDto, CreatePostDto, LocationDto, PostDetailDto, PostDto, PostListItemDto,
    UpdatePostDto,
};
use crate::presentation::handlers::profiles::{ProfileDto, PublicUserDto, UpdateProfileDto};
use crate::presentation::handlers::taxonomy::CategoryPostsDto;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::comments::list_comments,
        crate::presentation::handlers::comments::add_comment,
        crate::presentation::handlers::comments::update_comment,
        crate::presentation::handlers::comments::delete_comment,
        crate::presentation::handlers::taxonomy::list_categories,
        crate::presentation::handlers::taxonomy::category_posts,
        crate::presentation::handlers::taxonomy::list_locations,
        crate::presentation::handlers::profiles::get_profile,
        crate::presentation::handlers::profiles::update_profile
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            CreatePostDto,
            UpdatePostDto,
            AuthorDto,
            CategoryDto,
            LocationDto,
            PostDto,
            PostListItemDto,
            PostDetailDto,
            PostPageDto,
            CommentBodyDto,
            CommentDto,
            CategoryPostsDto,
            PublicUserDto,
            ProfileDto,
            UpdateProfileDto
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Post endpoints"),
        (name = "comments", description = "Comments on posts"),
        (name = "taxonomy", description = "Categories and locations"),
        (name = "profiles", description = "User profiles")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
