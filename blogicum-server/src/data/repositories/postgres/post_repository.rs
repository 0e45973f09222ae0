use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostListItem};
use crate::domain::taxonomy::{Category, Location};
use crate::domain::user::Author;
use crate::domain::visibility::PostFilter;

macro_rules! post_columns {
    () => {
        r#"
        p.id,
        p.title,
        p.text,
        p.image,
        p.pub_date,
        p.is_published,
        p.created_at,
        u.id AS author_id,
        u.username AS author_username,
        c.id AS category_id,
        c.title AS category_title,
        c.slug AS category_slug,
        c.description AS category_description,
        c.is_published AS category_is_published,
        l.id AS location_id,
        l.name AS location_name,
        l.is_published AS location_is_published
        "#
    };
}

macro_rules! post_joins {
    () => {
        r#"
        JOIN users u ON u.id = p.author_id
        JOIN categories c ON c.id = p.category_id
        LEFT JOIN locations l ON l.id = p.location_id
        "#
    };
}

// $1 author, $2 category, $3 live cut-off; NULL disables the condition.
macro_rules! post_filter {
    () => {
        r#"
        WHERE ($1::BIGINT IS NULL OR p.author_id = $1)
          AND ($2::BIGINT IS NULL OR p.category_id = $2)
          AND ($3::TIMESTAMPTZ IS NULL
               OR (p.is_published AND c.is_published AND p.pub_date <= $3))
        "#
    };
}

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    image: Option<String>,
    pub_date: DateTime<Utc>,
    is_published: bool,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    category_id: i64,
    category_title: String,
    category_slug: String,
    category_description: String,
    category_is_published: bool,
    location_id: Option<i64>,
    location_name: Option<String>,
    location_is_published: Option<bool>,
}

#[derive(FromRow)]
struct PostListRow {
    #[sqlx(flatten)]
    post: PostRow,
    comment_count: i64,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(concat!(
            r#"
            WITH p AS (
                INSERT INTO posts
                    (title, text, image, pub_date, is_published, author_id, category_id, location_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT
            "#,
            post_columns!(),
            "FROM p",
            post_joins!(),
        ))
        .bind(input.title)
        .bind(input.text)
        .bind(input.image)
        .bind(input.pub_date)
        .bind(input.is_published)
        .bind(input.author_id)
        .bind(input.category_id)
        .bind(input.location_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(map_row_to_post(row))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(concat!(
            "SELECT",
            post_columns!(),
            "FROM posts p",
            post_joins!(),
            "WHERE p.id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.map(map_row_to_post))
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(concat!(
            r#"
            WITH p AS (
                UPDATE posts
                SET title = $3,
                    text = $4,
                    image = $5,
                    pub_date = $6,
                    is_published = $7,
                    category_id = $8,
                    location_id = $9
                WHERE id = $1 AND author_id = $2
                RETURNING *
            )
            SELECT
            "#,
            post_columns!(),
            "FROM p",
            post_joins!(),
        ))
        .bind(post_id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.text)
        .bind(patch.image)
        .bind(patch.pub_date)
        .bind(patch.is_published)
        .bind(patch.category_id)
        .bind(patch.location_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.map(map_row_to_post))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostListItem>, DomainError> {
        let rows = sqlx::query_as::<_, PostListRow>(concat!(
            "SELECT",
            post_columns!(),
            r#",
            (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count
            FROM posts p
            "#,
            post_joins!(),
            post_filter!(),
            r#"
            ORDER BY p.pub_date DESC, p.id DESC
            LIMIT $4
            OFFSET $5
            "#,
        ))
        .bind(filter.author_id)
        .bind(filter.category_id)
        .bind(filter.scope.live_at())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| PostListItem {
                post: map_row_to_post(row.post),
                comment_count: row.comment_count,
            })
            .collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(concat!(
            "SELECT COUNT(*) FROM posts p",
            post_joins!(),
            post_filter!(),
        ))
        .bind(filter.author_id)
        .bind(filter.category_id)
        .bind(filter.scope.live_at())
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(count)
    }
}

fn map_row_to_post(row: PostRow) -> Post {
    let location = match (row.location_id, row.location_name) {
        (Some(id), Some(name)) => Some(Location {
            id,
            name,
            is_published: row.location_is_published.unwrap_or(false),
        }),
        _ => None,
    };

    Post {
        id: row.id,
        title: row.title,
        text: row.text,
        image: row.image,
        pub_date: row.pub_date,
        is_published: row.is_published,
        author: Author {
            id: row.author_id,
            username: row.author_username,
        },
        category: Category {
            id: row.category_id,
            title: row.category_title,
            slug: row.category_slug,
            description: row.category_description,
            is_published: row.category_is_published,
        },
        location,
        created_at: row.created_at,
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("posts_category_id_fkey") => "category",
            Some("posts_location_id_fkey") => "location",
            _ => "author",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use chrono::{DateTime, Duration, Utc};
    use sqlx::PgPool;

    use super::PostgresPostRepository;
    use crate::data::post_repository::{NewPost, Pagination, PostRepository};
    use crate::domain::post::Post;
    use crate::domain::visibility::{PostFilter, PostScope};
    use crate::infrastructure::database::{create_pool, run_migrations};

    fn unique_suffix() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock must be after unix epoch")
            .as_nanos()
    }

    async fn insert_user(pool: &PgPool, suffix: u128) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
        )
        .bind(format!("repo_{suffix}"))
        .bind(format!("repo_{suffix}@example.com"))
        .fetch_one(pool)
        .await
        .expect("user must be inserted")
    }

    async fn insert_category(pool: &PgPool, slug: String, is_published: bool) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO categories (title, slug, is_published) VALUES ($1, $1, $2) RETURNING id",
        )
        .bind(slug)
        .bind(is_published)
        .fetch_one(pool)
        .await
        .expect("category must be inserted")
    }

    async fn create(
        repo: &PostgresPostRepository,
        author_id: i64,
        pub_date: DateTime<Utc>,
        is_published: bool,
        category_id: i64,
    ) -> Post {
        repo.create_post(NewPost {
            title: "t".to_string(),
            text: "x".to_string(),
            image: None,
            pub_date,
            is_published,
            author_id,
            category_id,
            location_id: None,
        })
        .await
        .expect("post must be created")
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable postgres"]
    async fn live_scope_is_applied_to_page_and_count() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = create_pool(&url, 2).await.expect("pool must connect");
        run_migrations(&pool).await.expect("migrations must apply");
        let repo = PostgresPostRepository::new(pool.clone());

        let suffix = unique_suffix();
        let author = insert_user(&pool, suffix).await;
        let open = insert_category(&pool, format!("open-{suffix}"), true).await;
        let closed = insert_category(&pool, format!("closed-{suffix}"), false).await;
        let now = Utc::now();

        let live = create(&repo, author, now - Duration::hours(1), true, open).await;
        let older = create(&repo, author, now - Duration::hours(2), true, open).await;
        create(&repo, author, now + Duration::days(1), true, open).await;
        create(&repo, author, now - Duration::hours(1), false, open).await;
        create(&repo, author, now - Duration::hours(1), true, closed).await;

        let page = Pagination {
            page: 1,
            page_size: 10,
        };
        let live_filter = PostFilter::by_author(author, PostScope::LiveAt(now));
        let items = repo
            .list_posts(&live_filter, page)
            .await
            .expect("listing must succeed");
        let ids: Vec<i64> = items.iter().map(|item| item.post.id).collect();
        assert_eq!(ids, vec![live.id, older.id]);
        assert_eq!(repo.count_posts(&live_filter).await.expect("count"), 2);

        let own_filter = PostFilter::by_author(author, PostScope::Everything);
        assert_eq!(repo.count_posts(&own_filter).await.expect("count"), 5);

        let beyond = Pagination {
            page: u32::MAX,
            page_size: 10,
        };
        assert!(
            repo.list_posts(&live_filter, beyond)
                .await
                .expect("listing must succeed")
                .is_empty()
        );
    }
}
