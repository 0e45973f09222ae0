use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Собственные данные пользователя (включая email).
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
    /// Дата и время регистрации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичные данные пользователя на странице профиля.
pub struct PublicUser {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
    /// Дата и время регистрации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Автор поста или комментария.
pub struct Author {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Опубликованная категория.
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Название.
    pub title: String,
    /// Идентификатор для URL.
    pub slug: String,
    /// Описание.
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Опубликованное местоположение.
pub struct Location {
    /// Идентификатор местоположения.
    pub id: i64,
    /// Название места.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Текст поста.
    pub text: String,
    /// Ссылка на изображение.
    pub image: Option<String>,
    /// Дата публикации; пост в будущем считается отложенным.
    pub pub_date: DateTime<Utc>,
    /// Признак публикации.
    pub is_published: bool,
    /// Автор.
    pub author: Author,
    /// Категория.
    pub category: Category,
    /// Местоположение.
    pub location: Option<Location>,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пост в списке вместе с количеством комментариев.
pub struct PostSummary {
    /// Данные поста.
    #[serde(flatten)]
    pub post: Post,
    /// Количество комментариев.
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница постов с параметрами пагинации.
pub struct PostPage {
    /// Посты на текущей странице.
    pub items: Vec<PostSummary>,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки.
    pub offset: u32,
    /// Общее количество видимых постов.
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пост вместе с комментариями.
pub struct PostDetail {
    /// Данные поста.
    #[serde(flatten)]
    pub post: Post,
    /// Комментарии в порядке добавления.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Идентификатор поста.
    pub post_id: i64,
    /// Текст комментария.
    pub text: String,
    /// Автор.
    pub author: Author,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Категория и страница её постов.
pub struct CategoryPosts {
    /// Категория.
    pub category: Category,
    /// Страница постов.
    #[serde(flatten)]
    pub page: PostPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Профиль пользователя и видимые текущему пользователю посты.
pub struct Profile {
    /// Пользователь.
    pub user: PublicUser,
    /// Страница постов.
    pub posts: PostPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Данные для создания поста.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub text: String,
    /// Ссылка на изображение.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Дата публикации; по умолчанию момент запроса.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    /// Признак публикации; отложенный пост публикуется всегда.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    /// Категория.
    pub category_id: i64,
    /// Местоположение.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Полная замена полей поста.
pub struct PostUpdate {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub text: String,
    /// Ссылка на изображение.
    pub image: Option<String>,
    /// Дата публикации.
    pub pub_date: DateTime<Utc>,
    /// Признак публикации, сохраняется как передан.
    pub is_published: bool,
    /// Категория.
    pub category_id: i64,
    /// Местоположение.
    pub location_id: Option<i64>,
}

impl From<Post> for PostUpdate {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            text: post.text,
            image: post.image,
            pub_date: post.pub_date,
            is_published: post.is_published,
            category_id: post.category.id,
            location_id: post.location.map(|location| location.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Новые данные профиля.
pub struct ProfileUpdate {
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
}

impl From<User> for ProfileUpdate {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
