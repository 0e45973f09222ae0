//! Who may see which post, and when.
//!
//! Every function here is pure: the caller supplies `now` once per request and
//! the same instant is used for every decision made while serving it.

use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::post::Post;
use super::viewer::Viewer;

/// A post is live when it is published, its category is published and its
/// publication time has been reached.
pub(crate) fn is_live(post: &Post, now: DateTime<Utc>) -> bool {
    post.is_published && post.category.is_published && post.pub_date <= now
}

/// Authors always see their own posts; everyone else sees live posts only.
pub(crate) fn can_view(post: &Post, viewer: &Viewer, now: DateTime<Utc>) -> bool {
    viewer.is(post.author.id) || is_live(post, now)
}

/// Fails with the same `NotFound` an absent id would produce, so hidden posts
/// are indistinguishable from missing ones.
pub(crate) fn ensure_visible(
    post: &Post,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if can_view(post, viewer, now) {
        Ok(())
    } else {
        Err(DomainError::post_not_found(post.id))
    }
}

/// Predicate selecting which posts a listing may contain.
///
/// Repositories translate it into their query language; the same scope must be
/// used for the page and for the total so counts never reveal hidden posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostScope {
    /// Any state: drafts, unpublished and scheduled posts included.
    Everything,
    /// Only posts that are live at the given instant.
    LiveAt(DateTime<Utc>),
}

impl PostScope {
    #[cfg(test)]
    pub(crate) fn admits(&self, post: &Post) -> bool {
        match self {
            PostScope::Everything => true,
            PostScope::LiveAt(now) => is_live(post, *now),
        }
    }

    /// Cut-off instant for live-only scopes, `None` when unrestricted.
    pub(crate) fn live_at(&self) -> Option<DateTime<Utc>> {
        match self {
            PostScope::Everything => None,
            PostScope::LiveAt(now) => Some(*now),
        }
    }
}

/// Scope for the posts listed on `profile_owner_id`'s profile page.
pub(crate) fn visible_posts_for(
    profile_owner_id: i64,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> PostScope {
    if viewer.is(profile_owner_id) {
        PostScope::Everything
    } else {
        PostScope::LiveAt(now)
    }
}

/// Listing criteria shared by page and count queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PostFilter {
    pub(crate) author_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) scope: PostScope,
}

impl PostFilter {
    pub(crate) fn live(now: DateTime<Utc>) -> Self {
        Self {
            author_id: None,
            category_id: None,
            scope: PostScope::LiveAt(now),
        }
    }

    pub(crate) fn in_category(category_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::live(now)
        }
    }

    pub(crate) fn by_author(author_id: i64, scope: PostScope) -> Self {
        Self {
            author_id: Some(author_id),
            category_id: None,
            scope,
        }
    }

    /// In-memory form of the SQL listing predicate.
    #[cfg(test)]
    pub(crate) fn matches(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|id| post.author.id == id)
            && self.category_id.is_none_or(|id| post.category.id == id)
            && self.scope.admits(post)
    }
}
