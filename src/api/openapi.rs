use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::{
    api::models::{ErrorResponse, LoginRequest, SignUpForm, SignUpRequest, TodoCreateRequest, TodoModifyRequest},
    core::{
        models::user::Role,
        services::{
            todo_service::{TodoDetailResponse, TodoListResponse},
            user_service::{LoginResponse, UserSignUpResponse},
        },
    },
};

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::check_email,
        super::handlers::signup,
        super::handlers::sign_in,
        super::handlers::promote,
        super::handlers::load_s3,
        super::handlers::retrieve_todo_list,
        super::handlers::create_todo,
        super::handlers::update_todo,
        super::handlers::delete_todo
    ),
    components(schemas(
        SignUpRequest,
        SignUpForm,
        LoginRequest,
        TodoCreateRequest,
        TodoModifyRequest,
        ErrorResponse,
        Role,
        UserSignUpResponse,
        LoginResponse,
        TodoDetailResponse,
        TodoListResponse
    )),
    modifiers(&BearerSecurity),
    info(
        title = "Todo API",
        description = "Per-user todo lists with token authentication",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
