use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::fmt;

pub struct S3Config {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub bucket: String,
    pub endpoint: Option<String>,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
    pub s3: Option<S3Config>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("s3", &self.s3)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()), // Use a secure secret in production
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "todo-backend".to_string()),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            s3: s3_from_env(),
        }
    }
}

// S3 is only wired up when credentials and a bucket are all present.
fn s3_from_env() -> Option<S3Config> {
    let access_key = env::var("AWS_ACCESS_KEY").ok()?;
    let secret_key = env::var("AWS_SECRET_KEY").ok()?;
    let bucket = env::var("AWS_BUCKET").ok()?;

    Some(S3Config {
        access_key,
        secret_key,
        region: env::var("AWS_REGION").unwrap_or_else(|_| "ap-northeast-2".to_string()),
        bucket,
        endpoint: env::var("AWS_ENDPOINT").ok(),
    })
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
