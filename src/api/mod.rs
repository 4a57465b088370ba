pub mod handlers;
pub mod models;
pub mod openapi;

use crate::auth::jwt::JwtService;
use crate::core::services::{TodoService, UserService};
use axum::{Router, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub todos: Arc<TodoService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(users: UserService, todos: TodoService, jwt_service: Arc<JwtService>) -> Self {
        AppState {
            users: Arc::new(users),
            todos: Arc::new(todos),
            jwt_service,
        }
    }
}

/// Full application router: health check, `/api` routes and the Swagger UI.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", handlers::api_routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}
