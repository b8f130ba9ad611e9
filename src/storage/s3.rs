//! S3-backed object store
//!
//! Thin wrapper over the AWS SDK. The client is constructed once at startup
//! and shared across all invocations; see [`S3Store::connect`].

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use super::{GetOutcome, ObjectStore, StorageError};
use crate::config::StorageConfig;

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Builds the SDK client from configuration
    ///
    /// Custom endpoints (MinIO, LocalStack) switch to path-style addressing,
    /// which those stores expect.
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.endpoint.is_some() {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> GetOutcome {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => match output.body.collect().await {
                Ok(data) => GetOutcome::Found(data.into_bytes()),
                Err(err) => GetOutcome::Unavailable(err.to_string()),
            },
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_key())
                {
                    GetOutcome::Missing
                } else {
                    GetOutcome::Unavailable(err.to_string())
                }
            }
        }
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .cache_control(cache_control)
            .send()
            .await
            .map_err(|err| StorageError {
                key: key.to_string(),
                message: err.to_string(),
            })?;

        Ok(())
    }
}
