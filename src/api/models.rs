use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::TodoError;

// Request structs for JSON payloads
#[derive(Deserialize, Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub user_name: String,
}

/// Multipart layout of `POST /api/auth`; only used to document the endpoint.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SignUpForm {
    pub user: SignUpRequest,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_image: Option<Vec<u8>>,
}

#[derive(Deserialize, Serialize, ToSchema, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CheckEmailQuery {
    pub email: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema, Debug, Clone)]
pub struct TodoCreateRequest {
    pub title: String,
}

#[derive(Deserialize, Serialize, ToSchema, Debug, Clone)]
pub struct TodoModifyRequest {
    pub id: String,
    pub done: bool,
}

// Error response struct
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
}

// Newtype wrapper for TodoError to implement IntoResponse
pub struct ApiError(pub TodoError);

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, field) = match self.0 {
            TodoError::MissingField(field) => (StatusCode::BAD_REQUEST, format!("{} is required", field), Some(field)),
            TodoError::InvalidInput(field, detail) => (StatusCode::BAD_REQUEST, detail.description, Some(field)),
            TodoError::InvalidEmail(email) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid email: {}", email),
                Some("email".to_string()),
            ),
            TodoError::EmailAlreadyRegistered(email) => (
                StatusCode::BAD_REQUEST,
                format!("Email {} already registered", email),
                Some("email".to_string()),
            ),
            TodoError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid email or password".to_string(), None),
            TodoError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing or malformed Authorization header".to_string(),
                None,
            ),
            TodoError::InvalidToken(reason) => {
                tracing::debug!("Rejected token: {}", reason);
                (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string(), None)
            }
            TodoError::RoleNotPromotable(role) => (
                StatusCode::FORBIDDEN,
                format!("Users with role {} cannot be promoted", role),
                None,
            ),
            TodoError::TodoLimitExceeded(role, limit) => (
                StatusCode::FORBIDDEN,
                format!("Users with role {} may hold at most {} todos", role, limit),
                None,
            ),
            TodoError::UserNotFound(id) => (StatusCode::NOT_FOUND, format!("User {} not found", id), None),
            TodoError::ProfileImageNotFound(_) => (StatusCode::NOT_FOUND, "No profile image registered".to_string(), None),
            // Internal detail stays in the logs.
            err @ (TodoError::DatabaseError(_)
            | TodoError::ObjectStoreError(_)
            | TodoError::InternalServerError(_)) => {
                tracing::error!("Request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: error_message,
                field,
            }),
        )
            .into_response()
    }
}
