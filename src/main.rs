use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::{Method, header};
use todo_backend::{
    AppState, app,
    auth::{jwt::JwtService, password::PasswordHasher},
    config::CONFIG,
    core::services::{TodoService, UserService},
    infrastructure::{
        object_store::{ObjectStore, in_memory::InMemoryObjectStore, s3::S3ObjectStore},
        storage::{Storage, in_memory::InMemoryStorage, sqlite::SqliteStorage},
    },
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting with {:?}", *CONFIG);

    // Initialize storage and object store
    let storage: Arc<dyn Storage> = if CONFIG.database_url == "memory" {
        warn!("Using in-memory storage; data is lost on restart");
        Arc::new(InMemoryStorage::new())
    } else {
        Arc::new(SqliteStorage::connect(&CONFIG.database_url).await?)
    };

    let object_store: Arc<dyn ObjectStore> = match CONFIG.s3 {
        Some(ref s3_config) => Arc::new(S3ObjectStore::new(s3_config)),
        None => {
            warn!("AWS_ACCESS_KEY/AWS_SECRET_KEY/AWS_BUCKET not set; profile images are kept in memory");
            Arc::new(InMemoryObjectStore::new())
        }
    };

    let jwt_service = Arc::new(JwtService::new(&CONFIG.jwt_secret, CONFIG.jwt_issuer.clone()));
    let users = UserService::new(
        storage.clone(),
        object_store,
        jwt_service.clone(),
        PasswordHasher::new(CONFIG.bcrypt_cost),
    );
    let todos = TodoService::new(storage);
    let state = AppState::new(users, todos, jwt_service);

    let app = app(state)
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30))) // 30-second timeout
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
