use std::sync::Arc;

use tracing::info;

use super::blog_service::{PostPage, load_page};
use super::clock::Clock;
use crate::data::post_repository::{Pagination, PostRepository};
use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{UpdateProfileRequest, User};
use crate::domain::viewer::Viewer;
use crate::domain::visibility::{PostFilter, visible_posts_for};

#[derive(Debug, Clone)]
pub(crate) struct ProfilePage {
    pub(crate) user: User,
    pub(crate) posts: PostPage,
}

pub(crate) struct ProfileService<U: UserRepository, P: PostRepository> {
    users: U,
    posts: P,
    clock: Arc<dyn Clock>,
}

impl<U: UserRepository, P: PostRepository> ProfileService<U, P> {
    pub(crate) fn new(users: U, posts: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            posts,
            clock,
        }
    }

    /// Owners see every post of theirs; others see live posts only, and the
    /// total is counted under the same restriction.
    pub(crate) async fn get_profile(
        &self,
        viewer: &Viewer,
        username: &str,
        pagination: Pagination,
    ) -> Result<ProfilePage, DomainError> {
        let user = self
            .users
            .find_profile(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        let scope = visible_posts_for(user.id, viewer, self.clock.now());
        let posts = load_page(&self.posts, PostFilter::by_author(user.id, scope), pagination).await?;
        Ok(ProfilePage { user, posts })
    }

    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;
        let patch = ProfilePatch {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        };
        let user = self
            .users
            .update_profile(actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_user_id}")))?;
        info!(user_id = user.id, "profile updated");
        Ok(user)
    }
}
