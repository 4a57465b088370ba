use crate::{
    api::{AppState, models::*},
    auth::jwt::TokenUserInfo,
    core::{
        errors::TodoError,
        services::{
            todo_service::TodoListResponse,
            user_service::{LoginResponse, ProfileImage, UserSignUpResponse},
        },
    },
};
use axum::{
    Extension, Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, Query, Request, State, multipart::MultipartError,
        rejection::JsonRejection,
    },
    middleware::{self, Next},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use http::header;

/// Signup bodies carry the profile image, so they get a larger limit than axum's default.
const SIGNUP_BODY_LIMIT: usize = 10 * 1024 * 1024;

// Middleware to validate the bearer token
async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(TodoError::MissingToken)?;

    let user_info = state.jwt_service.validate_token(token)?;
    req.extensions_mut().insert(user_info);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/promote", put(promote))
        .route("/auth/load-s3", get(load_s3))
        .route(
            "/todos",
            get(retrieve_todo_list)
                .post(create_todo)
                .put(update_todo)
                .patch(update_todo),
        )
        .route("/todos/{id}", delete(delete_todo))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/auth/check", get(check_email))
        .route("/auth", post(signup).layer(DefaultBodyLimit::max(SIGNUP_BODY_LIMIT)))
        .route("/auth/signin", post(sign_in))
        .merge(protected_routes)
        .with_state(state)
}

fn multipart_error(err: MultipartError) -> TodoError {
    TodoError::invalid_input("multipart", "Malformed multipart body", err.body_text())
}

// axum answers 422 on its own; bad JSON bodies are plain validation errors here.
fn json_error(rejection: JsonRejection) -> TodoError {
    let detail = rejection.body_text();
    let field = missing_field(&detail).unwrap_or("body").to_string();
    TodoError::invalid_input(&field, "Invalid request body", detail)
}

fn missing_field(detail: &str) -> Option<&str> {
    let rest = detail.split_once("missing field `")?.1;
    rest.split_once('`').map(|(field, _)| field)
}

#[utoipa::path(
    get,
    path = "/api/auth/check",
    params(
        ("email" = String, Query, description = "Email address to look up")
    ),
    responses(
        (status = 200, description = "Whether the email is already registered", body = bool),
        (status = 400, description = "Email missing", body = ErrorResponse)
    )
)]
async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<CheckEmailQuery>,
) -> Result<Json<bool>, ApiError> {
    let email = query.email.unwrap_or_default();
    tracing::info!("/api/auth/check GET - {}", email);
    let duplicate = state.users.is_duplicate(&email).await?;
    Ok(Json(duplicate))
}

#[utoipa::path(
    post,
    path = "/api/auth",
    request_body(content = SignUpForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User registered", body = UserSignUpResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn signup(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UserSignUpResponse>, ApiError> {
    let mut request: Option<SignUpRequest> = None;
    let mut profile_image: Option<ProfileImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("user") => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                let parsed = serde_json::from_slice::<SignUpRequest>(&bytes)
                    .map_err(|e| TodoError::invalid_input("user", "Invalid signup payload", e.to_string()))?;
                request = Some(parsed);
            }
            Some("profileImage") => {
                let file_name = field.file_name().unwrap_or("profile").to_string();
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was picked.
                if !data.is_empty() {
                    profile_image = Some(ProfileImage {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    let request = request.ok_or_else(|| TodoError::MissingField("user".to_string()))?;
    tracing::info!(
        "/api/auth POST - {} (profile image: {})",
        request.email,
        profile_image.as_ref().map_or("none", |image| image.file_name.as_str())
    );

    let response = state
        .users
        .create(&request.email, &request.password, &request.user_name, profile_image)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Sign in successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(json_error)?;
    let response = state.users.authenticate(&req.email, &req.password).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/auth/promote",
    responses(
        (status = 200, description = "Promoted; token re-issued with the new role", body = LoginResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role cannot be promoted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn promote(
    State(state): State<AppState>,
    Extension(user_info): Extension<TokenUserInfo>,
) -> Result<Json<LoginResponse>, ApiError> {
    tracing::info!("/api/auth/promote PUT - user {}", user_info.user_id);
    let response = state.users.promote_to_premium(&user_info).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/load-s3",
    responses(
        (status = 200, description = "Public URL of the profile image", body = String),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No profile image", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn load_s3(
    State(state): State<AppState>,
    Extension(user_info): Extension<TokenUserInfo>,
) -> Result<Json<String>, ApiError> {
    let path = state.users.find_profile_path(&user_info.user_id).await?;
    Ok(Json(path))
}

#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Todos of the authenticated user", body = TodoListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn retrieve_todo_list(
    State(state): State<AppState>,
    Extension(user_info): Extension<TokenUserInfo>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let response = state.todos.retrieve(&user_info.user_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = TodoCreateRequest,
    responses(
        (status = 200, description = "Todo created; refreshed list", body = TodoListResponse),
        (status = 400, description = "Invalid title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Todo limit reached for this role", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_todo(
    State(state): State<AppState>,
    Extension(user_info): Extension<TokenUserInfo>,
    payload: Result<Json<TodoCreateRequest>, JsonRejection>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let Json(req) = payload.map_err(json_error)?;
    tracing::info!("/api/todos POST - user {}", user_info.user_id);
    let response = state.todos.insert(&req.title, &user_info.user_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/todos",
    request_body = TodoModifyRequest,
    responses(
        (status = 200, description = "Done flag updated; refreshed list", body = TodoListResponse),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_todo(
    State(state): State<AppState>,
    Extension(user_info): Extension<TokenUserInfo>,
    payload: Result<Json<TodoModifyRequest>, JsonRejection>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let Json(req) = payload.map_err(json_error)?;
    tracing::info!("/api/todos PUT|PATCH - todo {} done={}", req.id, req.done);
    let response = state.todos.modify(&req.id, req.done, &user_info.user_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(
        ("id" = String, Path, description = "ID of the todo to delete")
    ),
    responses(
        (status = 200, description = "Refreshed list, whether or not the todo existed", body = TodoListResponse),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_todo(
    State(state): State<AppState>,
    Extension(user_info): Extension<TokenUserInfo>,
    Path(todo_id): Path<String>,
) -> Result<Json<TodoListResponse>, ApiError> {
    tracing::info!("/api/todos/{} DELETE", todo_id);
    let response = state.todos.delete(&todo_id, &user_info.user_id).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::missing_field;

    #[test]
    fn test_missing_field_is_extracted() {
        assert_eq!(
            missing_field("Failed to deserialize the JSON body into the target type: missing field `title` at line 1 column 2"),
            Some("title")
        );
        assert_eq!(missing_field("Expected request with `Content-Type: application/json`"), None);
    }
}
