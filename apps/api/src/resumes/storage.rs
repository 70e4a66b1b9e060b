use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::ResumeError;

/// Object storage for resume files.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), ResumeError>;
    async fn get(&self, key: &str) -> Result<Bytes, ResumeError>;
}

pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<(), ResumeError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| ResumeError::Storage(format!("S3 upload failed: {e}")))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, ResumeError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ResumeError::Storage(format!("S3 download failed: {e}")))?;
        let data = object
            .body
            .collect()
            .await
            .map_err(|e| ResumeError::Storage(format!("S3 body read failed: {e}")))?;
        Ok(data.into_bytes())
    }
}

#[cfg(test)]
pub use memory::MemoryResumeStorage;
