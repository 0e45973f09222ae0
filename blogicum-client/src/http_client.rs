use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BlogClientError, BlogClientResult};
use crate::models::{
    AuthResponse, Category, CategoryPosts, Comment, Location, NewPost, Post, PostDetail, PostPage,
    PostUpdate, Profile, ProfileUpdate, User,
};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PageQuery {
    limit: u32,
    offset: u32,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `blogicum-server`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BlogClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        BlogClientError::from_http_status(status, Some(message))
    }

    async fn send(request: RequestBuilder) -> BlogClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn read_json<TRes: DeserializeOwned>(request: RequestBuilder) -> BlogClientResult<TRes> {
        Self::send(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    /// Регистрирует пользователя и возвращает JWT + данные пользователя.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BlogClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        Self::read_json(
            self.request(Method::POST, "/api/auth/register", None)
                .json(&payload),
        )
        .await
    }

    /// Выполняет вход пользователя и возвращает JWT + данные пользователя.
    pub async fn login(&self, username: &str, password: &str) -> BlogClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        Self::read_json(
            self.request(Method::POST, "/api/auth/login", None)
                .json(&payload),
        )
        .await
    }

    /// Возвращает страницу опубликованных постов.
    pub async fn list_posts(&self, limit: u32, offset: u32) -> BlogClientResult<PostPage> {
        Self::read_json(
            self.request(Method::GET, "/api/posts", None)
                .query(&PageQuery { limit, offset }),
        )
        .await
    }

    /// Получает пост с комментариями. С токеном автор видит свои скрытые посты.
    pub async fn get_post(&self, token: Option<&str>, id: i64) -> BlogClientResult<PostDetail> {
        Self::read_json(self.request(Method::GET, &format!("/api/posts/{id}"), token)).await
    }

    /// Создаёт пост от имени авторизованного пользователя.
    pub async fn create_post(&self, token: &str, post: &NewPost) -> BlogClientResult<Post> {
        Self::read_json(
            self.request(Method::POST, "/api/posts", Some(token))
                .json(post),
        )
        .await
    }

    /// Заменяет поля поста.
    pub async fn update_post(
        &self,
        token: &str,
        id: i64,
        post: &PostUpdate,
    ) -> BlogClientResult<Post> {
        Self::read_json(
            self.request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
                .json(post),
        )
        .await
    }

    /// Удаляет пост.
    pub async fn delete_post(&self, token: &str, id: i64) -> BlogClientResult<()> {
        Self::send(self.request(Method::DELETE, &format!("/api/posts/{id}"), Some(token))).await?;
        Ok(())
    }

    /// Возвращает комментарии к посту.
    pub async fn list_comments(
        &self,
        token: Option<&str>,
        post_id: i64,
    ) -> BlogClientResult<Vec<Comment>> {
        Self::read_json(self.request(
            Method::GET,
            &format!("/api/posts/{post_id}/comments"),
            token,
        ))
        .await
    }

    /// Добавляет комментарий к посту.
    pub async fn add_comment(
        &self,
        token: &str,
        post_id: i64,
        text: &str,
    ) -> BlogClientResult<Comment> {
        Self::read_json(
            self.request(
                Method::POST,
                &format!("/api/posts/{post_id}/comments"),
                Some(token),
            )
            .json(&CommentRequestDto { text }),
        )
        .await
    }

    /// Изменяет текст своего комментария.
    pub async fn update_comment(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> BlogClientResult<Comment> {
        Self::read_json(
            self.request(
                Method::PUT,
                &format!("/api/posts/{post_id}/comments/{comment_id}"),
                Some(token),
            )
            .json(&CommentRequestDto { text }),
        )
        .await
    }

    /// Удаляет свой комментарий.
    pub async fn delete_comment(
        &self,
        token: &str,
        post_id: i64,
        comment_id: i64,
    ) -> BlogClientResult<()> {
        Self::send(self.request(
            Method::DELETE,
            &format!("/api/posts/{post_id}/comments/{comment_id}"),
            Some(token),
        ))
        .await?;
        Ok(())
    }

    /// Возвращает опубликованные категории.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        Self::read_json(self.request(Method::GET, "/api/categories", None)).await
    }

    /// Возвращает категорию и страницу её постов.
    pub async fn category_posts(
        &self,
        slug: &str,
        limit: u32,
        offset: u32,
    ) -> BlogClientResult<CategoryPosts> {
        Self::read_json(
            self.request(Method::GET, &format!("/api/categories/{slug}/posts"), None)
                .query(&PageQuery { limit, offset }),
        )
        .await
    }

    /// Возвращает опубликованные местоположения.
    pub async fn list_locations(&self) -> BlogClientResult<Vec<Location>> {
        Self::read_json(self.request(Method::GET, "/api/locations", None)).await
    }

    /// Возвращает профиль пользователя и его посты.
    pub async fn get_profile(
        &self,
        token: Option<&str>,
        username: &str,
        limit: u32,
        offset: u32,
    ) -> BlogClientResult<Profile> {
        Self::read_json(
            self.request(Method::GET, &format!("/api/profiles/{username}"), token)
                .query(&PageQuery { limit, offset }),
        )
        .await
    }

    /// Обновляет профиль текущего пользователя.
    pub async fn update_profile(
        &self,
        token: &str,
        profile: &ProfileUpdate,
    ) -> BlogClientResult<User> {
        Self::read_json(
            self.request(Method::PUT, "/api/profile", Some(token))
                .json(profile),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostDetail, PostPage};

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8080/").expect("client");
        let full = client.endpoint("/api/posts");
        assert_eq!(full, "http://localhost:8080/api/posts");
    }

    #[test]
    fn post_page_reads_flattened_list_items() {
        let body = r#"{
            "items": [{
                "id": 7,
                "title": "Trip",
                "text": "Mountains",
                "image": null,
                "pub_date": "2024-05-01T12:00:00Z",
                "is_published": true,
                "author": {"id": 1, "username": "anna"},
                "category": {"id": 2, "title": "Travel", "slug": "travel", "description": ""},
                "location": null,
                "created_at": "2024-05-01T11:00:00Z",
                "comment_count": 3
            }],
            "limit": 10,
            "offset": 0,
            "total": 1
        }"#;

        let page: PostPage = serde_json::from_str(body).expect("page must parse");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].post.id, 7);
        assert_eq!(page.items[0].post.category.slug, "travel");
        assert_eq!(page.items[0].comment_count, 3);
    }

    #[test]
    fn post_detail_reads_comments_next_to_post_fields() {
        let body = r#"{
            "id": 7,
            "title": "Trip",
            "text": "Mountains",
            "image": "trip.png",
            "pub_date": "2024-05-01T12:00:00Z",
            "is_published": false,
            "author": {"id": 1, "username": "anna"},
            "category": {"id": 2, "title": "Travel", "slug": "travel", "description": ""},
            "location": {"id": 4, "name": "Alps"},
            "created_at": "2024-05-01T11:00:00Z",
            "comments": [{
                "id": 9,
                "post_id": 7,
                "text": "nice",
                "author": {"id": 3, "username": "ivan"},
                "created_at": "2024-05-01T13:00:00Z"
            }]
        }"#;

        let detail: PostDetail = serde_json::from_str(body).expect("detail must parse");
        assert!(!detail.post.is_published);
        assert_eq!(detail.post.location.map(|l| l.name).as_deref(), Some("Alps"));
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].author.username, "ivan");
    }

    #[test]
    fn new_post_omits_unset_optional_fields() {
        let post = NewPost {
            title: "t".to_string(),
            text: "x".to_string(),
            category_id: 2,
            ..NewPost::default()
        };
        let json = serde_json::to_value(&post).expect("serializable");
        assert_eq!(json["category_id"], 2);
        assert!(json.get("pub_date").is_none());
        assert!(json.get("is_published").is_none());
    }
}
