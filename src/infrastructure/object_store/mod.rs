use crate::core::errors::TodoError;
use async_trait::async_trait;

/// Destination for uploaded profile images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return the object's public URL.
    async fn upload(&self, data: Vec<u8>, key: &str, content_type: Option<&str>) -> Result<String, TodoError>;
}

pub mod in_memory;
pub mod s3;
