use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::blog_service::PostPage;
use crate::data::post_repository::Pagination;
use crate::presentation::handlers::posts::PostListItemDto;

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PaginationQuery {
    /// Items per page (1..=100)
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    /// Offset from the beginning; rounded down to a page boundary
    pub(crate) offset: Option<u32>,
}

impl PaginationQuery {
    pub(crate) fn into_pagination(self, default_limit: u32) -> Pagination {
        let limit = self.limit.unwrap_or(default_limit).max(1);
        let offset = self.offset.unwrap_or(0);
        Pagination {
            page: (offset / limit).saturating_add(1),
            page_size: limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPageDto {
    pub(crate) items: Vec<PostListItemDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<PostPage> for PostPageDto {
    fn from(page: PostPage) -> Self {
        let offset = page.page.saturating_sub(1).saturating_mul(page.page_size);
        Self {
            items: page.items.into_iter().map(PostListItemDto::from).collect(),
            limit: page.page_size,
            offset,
            total: page.total,
        }
    }
}
