//! Клиентская библиотека для работы с blogicum-server по HTTP.
//!
//! Клиент хранит JWT-токен после `register`/`login` и автоматически использует
//! его в защищённых операциях. В публичных операциях токен передаётся, если он
//! есть: так автор видит свои отложенные и снятые с публикации посты.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BlogClientError, BlogClientResult};
pub use models::{
    AuthResponse, Author, Category, CategoryPosts, Comment, Location, NewPost, Post, PostDetail,
    PostPage, PostSummary, PostUpdate, Profile, ProfileUpdate, PublicUser, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент REST API блога.
pub struct BlogClient {
    http_client: HttpClient,
    token: Option<String>,
}

impl BlogClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let result = self.http_client.register(username, email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let result = self.http_client.login(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Возвращает ленту опубликованных постов, от новых к старым.
    pub async fn list_posts(&self, limit: u32, offset: u32) -> BlogClientResult<PostPage> {
        self.http_client.list_posts(limit, offset).await
    }

    /// Возвращает пост с комментариями.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<PostDetail> {
        self.http_client.get_post(self.get_token(), id).await
    }

    /// Создаёт новый пост.
    ///
    /// Требует установленный JWT-токен.
    pub async fn create_post(&self, post: &NewPost) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http_client.create_post(token, post).await
    }

    /// Обновляет пост по идентификатору.
    ///
    /// Требует установленный JWT-токен.
    pub async fn update_post(&self, id: i64, post: &PostUpdate) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http_client.update_post(token, id, post).await
    }

    /// Удаляет пост по идентификатору.
    ///
    /// Требует установленный JWT-токен.
    pub async fn delete_post(&self, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http_client.delete_post(token, id).await
    }

    /// Возвращает комментарии к посту.
    pub async fn list_comments(&self, post_id: i64) -> BlogClientResult<Vec<Comment>> {
        self.http_client
            .list_comments(self.get_token(), post_id)
            .await
    }

    /// Добавляет комментарий.
    ///
    /// Требует установленный JWT-токен.
    pub async fn add_comment(&self, post_id: i64, text: &str) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http_client.add_comment(token, post_id, text).await
    }

    /// Изменяет комментарий.
    ///
    /// Требует установленный JWT-токен.
    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> BlogClientResult<Comment> {
        let token = self.require_token()?;
        self.http_client
            .update_comment(token, post_id, comment_id, text)
            .await
    }

    /// Удаляет комментарий.
    ///
    /// Требует установленный JWT-токен.
    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http_client
            .delete_comment(token, post_id, comment_id)
            .await
    }

    /// Возвращает опубликованные категории.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        self.http_client.list_categories().await
    }

    /// Возвращает посты категории по её slug.
    pub async fn category_posts(
        &self,
        slug: &str,
        limit: u32,
        offset: u32,
    ) -> BlogClientResult<CategoryPosts> {
        self.http_client.category_posts(slug, limit, offset).await
    }

    /// Возвращает опубликованные местоположения.
    pub async fn list_locations(&self) -> BlogClientResult<Vec<Location>> {
        self.http_client.list_locations().await
    }

    /// Возвращает профиль пользователя. Владелец видит все свои посты.
    pub async fn get_profile(
        &self,
        username: &str,
        limit: u32,
        offset: u32,
    ) -> BlogClientResult<Profile> {
        self.http_client
            .get_profile(self.get_token(), username, limit, offset)
            .await
    }

    /// Обновляет профиль текущего пользователя.
    ///
    /// Требует установленный JWT-токен.
    pub async fn update_profile(&self, profile: &ProfileUpdate) -> BlogClientResult<User> {
        let token = self.require_token()?;
        self.http_client.update_profile(token, profile).await
    }

    fn require_token(&self) -> BlogClientResult<&str> {
        self.token.as_deref().ok_or(BlogClientError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlogClient, BlogClientError, NewPost};

    #[tokio::test]
    async fn protected_calls_fail_fast_without_token() {
        let client = BlogClient::new("http://127.0.0.1:9").expect("client");
        let err = client
            .create_post(&NewPost::default())
            .await
            .expect_err("token is required");
        assert!(matches!(err, BlogClientError::Unauthorized));

        let err = client
            .delete_comment(1, 2)
            .await
            .expect_err("token is required");
        assert!(matches!(err, BlogClientError::Unauthorized));
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = BlogClient::new("http://127.0.0.1:9").expect("client");
        assert!(client.get_token().is_none());
        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));
        client.clear_token();
        assert!(client.get_token().is_none());
    }
}
