//! In-memory repositories for service tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostListItem};
use crate::domain::taxonomy::{Category, Location};
use crate::domain::user::User;
use crate::domain::visibility::PostFilter;

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Debug, Clone)]
struct PostRecord {
    id: i64,
    input: NewPost,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    input: NewComment,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<UserCredentials>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<PostRecord>,
    comments: Vec<CommentRecord>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i64) -> Result<&User, DomainError> {
        self.users
            .iter()
            .map(|creds| &creds.user)
            .find(|user| user.id == id)
            .ok_or_else(|| DomainError::NotFound("author".to_string()))
    }

    fn materialize(&self, record: &PostRecord) -> Result<Post, DomainError> {
        let author = self.user(record.input.author_id)?.as_author();
        let category = self
            .categories
            .iter()
            .find(|c| c.id == record.input.category_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound("category".to_string()))?;
        let location = match record.input.location_id {
            Some(id) => Some(
                self.locations
                    .iter()
                    .find(|l| l.id == id)
                    .cloned()
                    .ok_or_else(|| DomainError::NotFound("location".to_string()))?,
            ),
            None => None,
        };

        Ok(Post {
            id: record.id,
            title: record.input.title.clone(),
            text: record.input.text.clone(),
            image: record.input.image.clone(),
            pub_date: record.input.pub_date,
            is_published: record.input.is_published,
            author,
            category,
            location,
            created_at: record.created_at,
        })
    }

    fn comment(&self, record: &CommentRecord) -> Result<Comment, DomainError> {
        Ok(Comment {
            id: record.id,
            text: record.input.text.clone(),
            post_id: record.input.post_id,
            author: self.user(record.input.author_id)?.as_author(),
            created_at: record.created_at,
        })
    }

    fn filtered(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let mut posts = self
            .posts
            .iter()
            .map(|record| self.materialize(record))
            .collect::<Result<Vec<_>, _>>()?;
        posts.retain(|post| filter.matches(post));
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}

/// One shared store implementing every repository trait.
#[derive(Clone, Default)]
pub(crate) struct InMemoryBlog {
    state: Arc<Mutex<State>>,
}

impl InMemoryBlog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory state mutex poisoned")
    }

    pub(crate) fn seed_user(&self, username: &str) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        let user = User::new(
            id,
            username,
            format!("{username}@example.com"),
            "",
            "",
            fixed_now(),
        )
        .expect("seed user must be valid");
        state.users.push(UserCredentials {
            user,
            password_hash: String::new(),
        });
        id
    }

    pub(crate) fn seed_category(&self, slug: &str, is_published: bool) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.categories.push(Category {
            id,
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: String::new(),
            is_published,
        });
        id
    }

    pub(crate) fn seed_location(&self, name: &str, is_published: bool) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.locations.push(Location {
            id,
            name: name.to_string(),
            is_published,
        });
        id
    }

    pub(crate) fn seed_post(
        &self,
        author_id: i64,
        category_id: i64,
        pub_date: DateTime<Utc>,
        is_published: bool,
    ) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.posts.push(PostRecord {
            id,
            input: NewPost {
                title: format!("post {id}"),
                text: "body".to_string(),
                image: None,
                pub_date,
                is_published,
                author_id,
                category_id,
                location_id: None,
            },
            created_at: fixed_now(),
        });
        id
    }

    pub(crate) fn seed_comment(&self, post_id: i64, author_id: i64, text: &str) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.comments.push(CommentRecord {
            id,
            input: NewComment {
                text: text.to_string(),
                post_id,
                author_id,
            },
            created_at: fixed_now(),
        });
        id
    }

    pub(crate) fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub(crate) fn comment_text(&self, comment_id: i64) -> Option<String> {
        self.lock()
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .map(|c| c.input.text.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlog {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        let id = state.next_id();
        let record = PostRecord {
            id,
            input,
            created_at: fixed_now(),
        };
        let post = state.materialize(&record)?;
        state.posts.push(record);
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.lock();
        state
            .posts
            .iter()
            .find(|record| record.id == id)
            .map(|record| state.materialize(record))
            .transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        let Some(index) = state
            .posts
            .iter()
            .position(|r| r.id == post_id && r.input.author_id == owner_id)
        else {
            return Ok(None);
        };
        let record = &mut state.posts[index];
        record.input = NewPost {
            title: patch.title,
            text: patch.text,
            image: patch.image,
            pub_date: patch.pub_date,
            is_published: patch.is_published,
            author_id: owner_id,
            category_id: patch.category_id,
            location_id: patch.location_id,
        };
        let record = record.clone();
        state.materialize(&record).map(Some)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|r| r.id != id);
        state.comments.retain(|c| c.input.post_id != id);
        Ok(state.posts.len() < before)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostListItem>, DomainError> {
        let state = self.lock();
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(0);
        Ok(state
            .filtered(filter)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| {
                let comment_count = state
                    .comments
                    .iter()
                    .filter(|c| c.input.post_id == post.id)
                    .count() as i64;
                PostListItem {
                    post,
                    comment_count,
                }
            })
            .collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        Ok(self.lock().filtered(filter)?.len() as i64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlog {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|p| p.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        let id = state.next_id();
        let record = CommentRecord {
            id,
            input,
            created_at: fixed_now(),
        };
        let comment = state.comment(&record)?;
        state.comments.push(record);
        Ok(comment)
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        let state = self.lock();
        state
            .comments
            .iter()
            .find(|c| c.id == comment_id && c.input.post_id == post_id)
            .map(|c| state.comment(c))
            .transpose()
    }

    async fn update_comment(
        &self,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        let Some(index) = state.comments.iter().position(|c| c.id == comment_id) else {
            return Ok(None);
        };
        state.comments[index].input.text = text;
        let record = state.comments[index].clone();
        state.comment(&record).map(Some)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        Ok(state.comments.len() < before)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let state = self.lock();
        let mut records: Vec<&CommentRecord> = state
            .comments
            .iter()
            .filter(|c| c.input.post_id == post_id)
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records.into_iter().map(|c| state.comment(c)).collect()
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryBlog {
    async fn find_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_published_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| c.is_published)
            .cloned()
            .collect())
    }

    async fn find_location(&self, id: i64) -> Result<Option<Location>, DomainError> {
        Ok(self.lock().locations.iter().find(|l| l.id == id).cloned())
    }

    async fn list_published_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self
            .lock()
            .locations
            .iter()
            .filter(|l| l.is_published)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlog {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if state.users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let id = state.next_id();
        let user = User::new(
            id,
            input.username,
            input.email,
            input.first_name,
            input.last_name,
            fixed_now(),
        )?;
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn find_profile(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .map(|c| c.user.clone()))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        let clash = |field: &str| {
            state.users.iter().any(|c| {
                c.user.id != user_id
                    && match field {
                        "username" => c.user.username == patch.username,
                        _ => c.user.email == patch.email,
                    }
            })
        };
        if clash("username") {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if clash("email") {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let Some(creds) = state.users.iter_mut().find(|c| c.user.id == user_id) else {
            return Ok(None);
        };
        creds.user.username = patch.username;
        creds.user.email = patch.email;
        creds.user.first_name = patch.first_name;
        creds.user.last_name = patch.last_name;
        Ok(Some(creds.user.clone()))
    }
}
