use std::sync::Arc;

use tracing::info;

use super::clock::Clock;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::authorization::authorize_mutation;
use crate::domain::comment::{Comment, CommentRequest};
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::viewer::Viewer;
use crate::domain::visibility::ensure_visible;

pub(crate) struct CommentService<C: CommentRepository, P: PostRepository> {
    comments: C,
    posts: P,
    clock: Arc<dyn Clock>,
}

impl<C: CommentRepository, P: PostRepository> CommentService<C, P> {
    pub(crate) fn new(comments: C, posts: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            posts,
            clock,
        }
    }

    pub(crate) async fn list_comments(
        &self,
        viewer: &Viewer,
        post_id: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        self.ensure_post_visible(viewer, post_id).await?;
        self.comments.list_for_post(post_id).await
    }

    /// Comments of a post the caller has already resolved through a visibility check.
    pub(crate) async fn comments_for(&self, post: &Post) -> Result<Vec<Comment>, DomainError> {
        self.comments.list_for_post(post.id).await
    }

    pub(crate) async fn add_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        self.ensure_post_visible(&Viewer::User(actor_user_id), post_id)
            .await?;

        let comment = self
            .comments
            .create_comment(NewComment {
                text: req.text,
                post_id,
                author_id: actor_user_id,
            })
            .await?;
        info!(comment_id = comment.id, post_id, actor_user_id, "comment added");
        Ok(comment)
    }

    pub(crate) async fn update_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        let original = self.find_comment(post_id, comment_id).await?;
        authorize_mutation(actor_user_id, original.author.id)?;

        let comment = self
            .comments
            .update_comment(comment_id, req.text)
            .await?
            .ok_or_else(|| DomainError::comment_not_found(comment_id))?;
        info!(comment_id, post_id, actor_user_id, "comment updated");
        Ok(comment)
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        let original = self.find_comment(post_id, comment_id).await?;
        authorize_mutation(actor_user_id, original.author.id)?;

        if !self.comments.delete_comment(comment_id).await? {
            return Err(DomainError::comment_not_found(comment_id));
        }
        info!(comment_id, post_id, actor_user_id, "comment deleted");
        Ok(())
    }

    async fn find_comment(&self, post_id: i64, comment_id: i64) -> Result<Comment, DomainError> {
        self.comments
            .get_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| DomainError::comment_not_found(comment_id))
    }

    async fn ensure_post_visible(&self, viewer: &Viewer, post_id: i64) -> Result<(), DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        ensure_visible(&post, viewer, self.clock.now())
    }
}
