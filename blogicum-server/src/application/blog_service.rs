use std::sync::Arc;

use tracing::{debug, info};

use super::clock::Clock;
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::domain::authorization::authorize_mutation;
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, PostListItem, UpdatePostRequest};
use crate::domain::publication::resolve_publish_flag;
use crate::domain::taxonomy::{Category, Location};
use crate::domain::viewer::Viewer;
use crate::domain::visibility::{PostFilter, can_view};

/// One page of a post listing. `total` is counted with the page's filter.
#[derive(Debug, Clone)]
pub(crate) struct PostPage {
    pub(crate) items: Vec<PostListItem>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total: i64,
}

pub(crate) async fn load_page<R: PostRepository + ?Sized>(
    repo: &R,
    filter: PostFilter,
    pagination: Pagination,
) -> Result<PostPage, DomainError> {
    let items = repo.list_posts(&filter, pagination).await?;
    let total = repo.count_posts(&filter).await?;

    Ok(PostPage {
        items,
        page: pagination.page,
        page_size: pagination.page_size,
        total,
    })
}

pub(crate) struct BlogService<P: PostRepository, T: TaxonomyRepository> {
    posts: P,
    taxonomy: T,
    clock: Arc<dyn Clock>,
}

impl<P: PostRepository, T: TaxonomyRepository> BlogService<P, T> {
    pub(crate) fn new(posts: P, taxonomy: T, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            taxonomy,
            clock,
        }
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        self.ensure_choices(req.category_id, req.location_id).await?;

        let now = self.clock.now();
        let pub_date = req.pub_date.unwrap_or(now);
        let new_post = NewPost {
            title: req.title,
            text: req.text,
            image: req.image,
            pub_date,
            is_published: resolve_publish_flag(pub_date, req.is_published.unwrap_or(true), now),
            author_id,
            category_id: req.category_id,
            location_id: req.location_id,
        };
        let post = self.posts.create_post(new_post).await?;
        info!(
            post_id = post.id,
            author_id,
            scheduled = post.pub_date > now,
            "post created"
        );
        Ok(post)
    }

    pub(crate) async fn get_post(&self, viewer: &Viewer, id: i64) -> Result<Post, DomainError> {
        let post = self
            .posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        if !can_view(&post, viewer, self.clock.now()) {
            debug!(post_id = id, ?viewer, "post hidden from viewer");
            return Err(DomainError::post_not_found(id));
        }
        Ok(post)
    }

    /// The publication flag is stored as submitted; scheduling is not re-applied.
    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        let original_post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        authorize_mutation(actor_user_id, original_post.author.id)?;
        self.ensure_choices(req.category_id, req.location_id).await?;

        let patch = PostPatch {
            title: req.title,
            text: req.text,
            image: req.image,
            pub_date: req.pub_date,
            is_published: req.is_published,
            category_id: req.category_id,
            location_id: req.location_id,
        };
        let post = self
            .posts
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, actor_user_id, "post updated");
        Ok(post)
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let original_post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        authorize_mutation(actor_user_id, original_post.author.id)?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::post_not_found(post_id));
        }
        info!(post_id, actor_user_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn list_index(&self, pagination: Pagination) -> Result<PostPage, DomainError> {
        load_page(&self.posts, PostFilter::live(self.clock.now()), pagination).await
    }

    pub(crate) async fn list_category(
        &self,
        slug: &str,
        pagination: Pagination,
    ) -> Result<(Category, PostPage), DomainError> {
        let category = self
            .taxonomy
            .find_category_by_slug(slug)
            .await?
            .filter(|category| category.is_published)
            .ok_or_else(|| DomainError::NotFound(format!("category: {slug}")))?;

        let filter = PostFilter::in_category(category.id, self.clock.now());
        let page = load_page(&self.posts, filter, pagination).await?;
        Ok((category, page))
    }

    pub(crate) async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.taxonomy.list_published_categories().await
    }

    pub(crate) async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        self.taxonomy.list_published_locations().await
    }

    // Authoring only offers published categories and locations.
    async fn ensure_choices(
        &self,
        category_id: i64,
        location_id: Option<i64>,
    ) -> Result<(), DomainError> {
        let category = self.taxonomy.find_category(category_id).await?;
        if !category.is_some_and(|c| c.is_published) {
            return Err(DomainError::validation(
                "category_id",
                "must reference a published category",
            ));
        }

        if let Some(location_id) = location_id {
            let location = self.taxonomy.find_location(location_id).await?;
            if !location.is_some_and(|l| l.is_published) {
                return Err(DomainError::validation(
                    "location_id",
                    "must reference a published location",
                ));
            }
        }
        Ok(())
    }
}
