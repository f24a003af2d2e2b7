//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_USER_NAME_LENGTH, MIN_USER_NAME_LENGTH};
use crate::domain::values::Email;
use crate::errors::{AppError, AppResult};

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user. New users start active.
    pub fn create(name: &str, email: &str, password_hash: &str) -> AppResult<Self> {
        Self::validate_name(name)?;
        Self::validate_password_hash(password_hash)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: Email::new(email)?,
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Update name and email
    pub fn update(&mut self, name: &str, email: &str) -> AppResult<()> {
        Self::validate_name(name)?;
        self.name = name.trim().to_string();
        self.email = Email::new(email)?;
        Ok(())
    }

    /// Replace the stored password hash
    pub fn update_password(&mut self, new_password_hash: &str) -> AppResult<()> {
        Self::validate_password_hash(new_password_hash)?;
        self.password_hash = new_password_hash.to_string();
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    fn validate_name(name: &str) -> AppResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if trimmed.len() < MIN_USER_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Name must be at least {} characters long",
                MIN_USER_NAME_LENGTH
            )));
        }
        if trimmed.len() > MAX_USER_NAME_LENGTH {
            return Err(AppError::validation(format!(
                "Name cannot be longer than {} characters",
                MAX_USER_NAME_LENGTH
            )));
        }
        Ok(())
    }

    fn validate_password_hash(password_hash: &str) -> AppResult<()> {
        if password_hash.trim().is_empty() {
            return Err(AppError::validation("Password hash cannot be empty"));
        }
        Ok(())
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}
