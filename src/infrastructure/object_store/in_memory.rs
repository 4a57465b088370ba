use crate::core::errors::TodoError;
use crate::infrastructure::object_store::ObjectStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const MEMORY_URL_PREFIX: &str = "memory://";

#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        InMemoryObjectStore::default()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(&self, data: Vec<u8>, key: &str, _content_type: Option<&str>) -> Result<String, TodoError> {
        self.objects.write().await.insert(key.to_string(), data);
        Ok(format!("{}{}", MEMORY_URL_PREFIX, key))
    }
}
