use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::user::Author;

const TEXT_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author: Author,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) text: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() || text.chars().count() > TEXT_MAX_CHARS {
            return Err(DomainError::validation("text", "must be 1..2000 chars"));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}
