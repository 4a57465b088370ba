use serde::Serialize;
use thiserror::Error;

use crate::core::models::user::Role;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum TodoError {
    #[error("Field `{0}` is required")]
    MissingField(String),
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("User {0} has no profile image")]
    ProfileImageNotFound(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing or malformed Authorization header")]
    MissingToken,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Role {0} cannot be promoted")]
    RoleNotPromotable(Role),
    #[error("Role {0} may hold at most {1} todos")]
    TodoLimitExceeded(Role, usize),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Object store error: {0}")]
    ObjectStoreError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl TodoError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        TodoError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.into(),
                description: description.into(),
            },
        )
    }
}

impl From<sqlx::Error> for TodoError {
    fn from(err: sqlx::Error) -> Self {
        TodoError::DatabaseError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for TodoError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        TodoError::DatabaseError(format!("Migration failed: {}", err))
    }
}
