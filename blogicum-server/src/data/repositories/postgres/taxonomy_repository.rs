use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::domain::error::DomainError;
use crate::domain::taxonomy::{Category, Location};

#[derive(Debug, Clone)]
pub(crate) struct PostgresTaxonomyRepository {
    pool: PgPool,
}

impl PostgresTaxonomyRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    title: String,
    slug: String,
    description: String,
    is_published: bool,
}

#[derive(FromRow)]
struct LocationRow {
    id: i64,
    name: String,
    is_published: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            is_published: row.is_published,
        }
    }
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_published: row.is_published,
        }
    }
}

#[async_trait]
impl TaxonomyRepository for PostgresTaxonomyRepository {
    async fn find_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, title, slug, description, is_published FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_taxonomy_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, title, slug, description, is_published FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_taxonomy_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn list_published_categories(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, title, slug, description, is_published
            FROM categories
            WHERE is_published
            ORDER BY title ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_taxonomy_db_error)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_location(&self, id: i64) -> Result<Option<Location>, DomainError> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, is_published FROM locations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_taxonomy_db_error)?;

        Ok(row.map(Location::from))
    }

    async fn list_published_locations(&self) -> Result<Vec<Location>, DomainError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, name, is_published
            FROM locations
            WHERE is_published
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_taxonomy_db_error)?;

        Ok(rows.into_iter().map(Location::from).collect())
    }
}

fn map_taxonomy_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}
