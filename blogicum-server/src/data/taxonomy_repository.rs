use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::taxonomy::{Category, Location};

#[async_trait]
pub(crate) trait TaxonomyRepository: Send + Sync {
    async fn find_category(&self, id: i64) -> Result<Option<Category>, DomainError>;
    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn list_published_categories(&self) -> Result<Vec<Category>, DomainError>;
    async fn find_location(&self, id: i64) -> Result<Option<Location>, DomainError>;
    async fn list_published_locations(&self) -> Result<Vec<Location>, DomainError>;
}
