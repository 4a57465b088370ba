use crate::config::S3Config;
use crate::core::errors::TodoError;
use crate::infrastructure::object_store::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;

/// Uploads into a single bucket with static credentials. No retry or multipart.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    base_url: String,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(&config.access_key, &config.secret_key, None, None, "static");
        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(builder.build());
        tracing::info!("S3 object store enabled: bucket={}, region={}", config.bucket, config.region);
        Self::with_client(client, config)
    }

    /// Use a pre-built client, e.g. one pointed at a local MinIO.
    pub fn with_client(client: aws_sdk_s3::Client, config: &S3Config) -> Self {
        S3ObjectStore {
            client,
            bucket: config.bucket.clone(),
            base_url: public_base_url(config),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

/// Virtual-hosted style for AWS, path style for custom endpoints.
fn public_base_url(config: &S3Config) -> String {
    match config.endpoint {
        Some(ref endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
        None => format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, data: Vec<u8>, key: &str, content_type: Option<&str>) -> Result<String, TodoError> {
        let size = data.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|e| TodoError::ObjectStoreError(format!("Failed to upload {}: {}", key, e)))?;

        tracing::info!("Uploaded {} ({} bytes) to bucket {}", key, size, self.bucket);
        Ok(self.object_url(key))
    }
}
