mod user_tests;

use crate::api::AppState;
use crate::auth::jwt::{JwtService, TokenUserInfo};
use crate::auth::password::PasswordHasher;
use crate::core::services::user_service::LoginResponse;
use crate::core::services::{TodoService, UserService};
use crate::infrastructure::object_store::in_memory::InMemoryObjectStore;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0123456789";
pub const TEST_ISSUER: &str = "todo-backend-test";
/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub state: AppState,
    pub storage: InMemoryStorage,
    pub object_store: InMemoryObjectStore,
}

pub fn create_test_app() -> TestApp {
    let storage = InMemoryStorage::new();
    let object_store = InMemoryObjectStore::new();
    let jwt_service = Arc::new(JwtService::new(TEST_SECRET, TEST_ISSUER));
    let users = UserService::new(
        Arc::new(storage.clone()),
        Arc::new(object_store.clone()),
        jwt_service.clone(),
        PasswordHasher::new(TEST_BCRYPT_COST),
    );
    let todos = TodoService::new(Arc::new(storage.clone()));
    TestApp {
        state: AppState::new(users, todos, jwt_service),
        storage,
        object_store,
    }
}

/// Registers a user with a valid password, signs them in and decodes the token.
pub async fn register_and_sign_in(app: &TestApp, email: &str, user_name: &str) -> (LoginResponse, TokenUserInfo) {
    app.state
        .users
        .create(email, "password123", user_name, None)
        .await
        .unwrap();
    let login = app.state.users.authenticate(email, "password123").await.unwrap();
    let user_info = app.state.jwt_service.validate_token(&login.token).unwrap();
    (login, user_info)
}
