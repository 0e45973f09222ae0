use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::user::Author;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    text: String,
    post_id: i64,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH cm AS (
                INSERT INTO comments (text, post_id, author_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT cm.id, cm.text, cm.post_id, cm.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM cm
            JOIN users u ON u.id = cm.author_id
            "#,
        )
        .bind(input.text)
        .bind(input.post_id)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(map_row_to_comment(row))
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT cm.id, cm.text, cm.post_id, cm.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM comments cm
            JOIN users u ON u.id = cm.author_id
            WHERE cm.id = $1 AND cm.post_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(row.map(map_row_to_comment))
    }

    async fn update_comment(
        &self,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH cm AS (
                UPDATE comments
                SET text = $2
                WHERE id = $1
                RETURNING *
            )
            SELECT cm.id, cm.text, cm.post_id, cm.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM cm
            JOIN users u ON u.id = cm.author_id
            "#,
        )
        .bind(comment_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(row.map(map_row_to_comment))
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT cm.id, cm.text, cm.post_id, cm.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM comments cm
            JOIN users u ON u.id = cm.author_id
            WHERE cm.post_id = $1
            ORDER BY cm.created_at ASC, cm.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(rows.into_iter().map(map_row_to_comment).collect())
    }
}

fn map_row_to_comment(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        text: row.text,
        post_id: row.post_id,
        author: Author {
            id: row.author_id,
            username: row.author_username,
        },
        created_at: row.created_at,
    }
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("comments_post_id_fkey") => "post",
            _ => "author",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
