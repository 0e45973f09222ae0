use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::taxonomy::{Category, Location};
use super::user::Author;

const TITLE_MAX_CHARS: usize = 256;
const IMAGE_MAX_CHARS: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author: Author,
    pub(crate) category: Category,
    pub(crate) location: Option<Location>,
    pub(crate) created_at: DateTime<Utc>,
}

/// A post as it appears in listings.
#[derive(Debug, Clone)]
pub(crate) struct PostListItem {
    pub(crate) post: Post,
    pub(crate) comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: Option<bool>,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_positive_i64("category_id", self.category_id)?;
        if let Some(location_id) = self.location_id {
            validate_positive_i64("location_id", location_id)?;
        }
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            image: normalize_image(self.image)?,
            ..self
        })
    }
}

/// Full replacement of an existing post. `is_published` is taken verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_positive_i64("category_id", self.category_id)?;
        if let Some(location_id) = self.location_id {
            validate_positive_i64("location_id", location_id)?;
        }
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            image: normalize_image(self.image)?,
            ..self
        })
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::validation(field, "must be > 0"));
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::validation("title", "must be 1..256 chars"));
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::validation("text", "must not be empty"));
    }
    Ok(text.to_string())
}

fn normalize_image(image: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(image) = image else {
        return Ok(None);
    };
    let image = image.trim();
    if image.is_empty() {
        return Ok(None);
    }
    if image.chars().count() > IMAGE_MAX_CHARS {
        return Err(DomainError::validation("image", "must be at most 512 chars"));
    }
    Ok(Some(image.to_string()))
}
