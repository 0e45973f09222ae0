use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

const NAME_MAX_CHARS: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        let password_len = self.password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(DomainError::validation("password", "must be 8..128 chars"));
        }
        Ok(Self {
            username,
            email,
            password: self.password,
            first_name: normalize_name("first_name", &self.first_name)?,
            last_name: normalize_name("last_name", &self.last_name)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::validation("username", "must be 1..64 chars"));
        }

        if self.password.is_empty() {
            return Err(DomainError::validation("password", "must not be empty"));
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// Profile fields a user may change on their own account. No password here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            username: normalize_username(&self.username)?,
            email: normalize_email(&self.email)?,
            first_name: normalize_name("first_name", &self.first_name)?,
            last_name: normalize_name("last_name", &self.last_name)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        let username = normalize_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at,
        })
    }

    pub(crate) fn as_author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Owner of a post or comment, as attached to the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Author {
    pub(crate) id: i64,
    pub(crate) username: String,
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::validation("username", "must be 3..64 chars"));
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::validation("email", "must be a valid email"));
    }
    Ok(email)
}

fn normalize_name(field: &'static str, name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(DomainError::validation(field, "must be at most 150 chars"));
    }
    Ok(name.to_string())
}
