use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::server::requests::ContentItemRequest;
use crate::services::content_service::{BulkSaveResult, PageContentMap};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
}

/// The slice of the CMS API the editor sessions talk to.
#[async_trait]
pub trait CmsBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ClientResult<CurrentUser>;
    async fn logout(&self) -> ClientResult<()>;
    async fn me(&self) -> ClientResult<CurrentUser>;
    async fn page_content(&self, page: &str) -> ClientResult<PageContentMap>;
    async fn bulk_save(&self, items: Vec<ContentItemRequest>) -> ClientResult<BulkSaveResult>;
}
