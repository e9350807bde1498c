//! Object storage for uploaded media.
//!
//! Two buckets back the site: a public one served through `R2_PUBLIC_URL`
//! and a private one only reachable through pre-signed URLs. Production uses
//! Cloudflare R2 through its S3-compatible API; tests use in-memory stores.

pub mod image;

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use object_store::{
    aws::AmazonS3Builder, memory::InMemory, path::Path, signer::Signer, Attribute,
    AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload,
};
use thiserror::Error;

use crate::config::R2Config;

pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("the private bucket does not support signed URLs")]
    SigningUnsupported,
}

#[derive(Clone)]
pub struct MediaStorage {
    public: Arc<dyn ObjectStore>,
    private_signer: Option<Arc<dyn Signer>>,
    public_url: String,
}

impl MediaStorage {
    pub fn new(
        public: Arc<dyn ObjectStore>,
        private_signer: Option<Arc<dyn Signer>>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            public,
            private_signer,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_r2(config: &R2Config) -> Result<Self, StorageError> {
        let bucket = |name: &str| {
            AmazonS3Builder::new()
                .with_endpoint(config.endpoint())
                .with_region("auto")
                .with_bucket_name(name)
                .with_access_key_id(&config.access_key_id)
                .with_secret_access_key(&config.secret_access_key)
                .build()
        };

        let public = bucket(&config.bucket_public)?;
        let private = bucket(&config.bucket_private)?;

        Ok(Self::new(
            Arc::new(public),
            Some(Arc::new(private) as Arc<dyn Signer>),
            config.public_url.clone(),
        ))
    }

    pub fn in_memory(public_url: impl Into<String>) -> Self {
        Self::new(
            Arc::new(InMemory::new()),
            None,
            public_url,
        )
    }

    pub fn public_store(&self) -> Arc<dyn ObjectStore> {
        self.public.clone()
    }

    pub fn public_url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    /// The object key behind a public URL, if it points into the public bucket.
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    fn path(key: &str) -> Result<Path, StorageError> {
        Path::parse(key).map_err(|_| StorageError::InvalidKey(key.to_string()))
    }

    /// Stores `bytes` in the public bucket and returns the public URL.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = Self::path(key)?;
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.public
            .put_opts(&path, PutPayload::from(bytes), options)
            .await?;
        Ok(self.public_url_for(key))
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = Self::path(key)?;
        self.public.delete(&path).await?;
        Ok(())
    }

    pub async fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, StorageError> {
        let signer = self.private_signer.as_ref().ok_or(StorageError::SigningUnsupported)?;
        let path = Self::path(key)?;
        let url = signer.signed_url(Method::GET, &path, expires_in).await?;
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_public_url() {
        let storage = MediaStorage::in_memory("https://cdn.czapliskosiedlisko.pl/");
        let url = storage.public_url_for("images/a-original.jpg");
        assert_eq!(url, "https://cdn.czapliskosiedlisko.pl/images/a-original.jpg");
        assert_eq!(
            storage.key_from_url(&url).as_deref(),
            Some("images/a-original.jpg")
        );
        assert_eq!(storage.key_from_url("https://elsewhere.pl/images/a.jpg"), None);
    }

    #[tokio::test]
    async fn upload_then_delete() {
        let storage = MediaStorage::in_memory("https://cdn.test");
        let url = storage
            .upload("images/x.webp", vec![1, 2, 3], "image/webp")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/images/x.webp");

        let stored = storage
            .public_store()
            .get(&Path::from("images/x.webp"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(stored.as_ref(), &[1, 2, 3]);

        storage.delete("images/x.webp").await.unwrap();
        assert!(storage
            .public_store()
            .get(&Path::from("images/x.webp"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn in_memory_store_cannot_sign() {
        let storage = MediaStorage::in_memory("https://cdn.test");
        let err = storage
            .signed_url("contracts/a.pdf", SIGNED_URL_TTL)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SigningUnsupported));
    }
}
