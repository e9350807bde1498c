use serde_json::Value;

use super::backend::{ClientResult, CmsBackend};
use super::edit_mode::EditSession;
use crate::database::entities::ContentType;
use crate::services::content_service::{ContentEntry, PageContentMap};

/// Cached content of one page, as served by `/api/public/content/:page`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    page: String,
    content: PageContentMap,
}

impl PageContent {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            content: PageContentMap::new(),
        }
    }

    pub fn with_content(page: impl Into<String>, content: PageContentMap) -> Self {
        Self {
            page: page.into(),
            content,
        }
    }

    /// Fetches the page; a failed fetch yields an empty page.
    pub async fn load(backend: &dyn CmsBackend, page: impl Into<String>) -> Self {
        let mut content = Self::new(page);
        if let Err(e) = content.refresh(backend).await {
            tracing::warn!("Failed to load content for page {}: {}", content.page, e);
        }
        content
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn content(&self) -> &PageContentMap {
        &self.content
    }

    /// Replaces the cached content. On error the previous content is kept.
    pub async fn refresh(&mut self, backend: &dyn CmsBackend) -> ClientResult<()> {
        self.content = backend.page_content(&self.page).await?;
        Ok(())
    }

    fn entry(&self, section: &str, key: &str) -> Option<&ContentEntry> {
        self.content.get(section)?.get(key)
    }

    /// A staged edit wins while edit mode is on, then the stored value, then
    /// `fallback`.
    pub fn get(&self, edit: &EditSession, section: &str, key: &str, fallback: &str) -> String {
        if edit.edit_mode() {
            if let Some(change) = edit.pending_change(&self.page, section, key) {
                return change.value.clone();
            }
        }
        self.entry(section, key)
            .map(|entry| entry.value.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn get_image(&self, edit: &EditSession, section: &str, key: &str, fallback: &str) -> String {
        self.get(edit, section, key, fallback)
    }

    pub fn exists(&self, section: &str, key: &str) -> bool {
        self.entry(section, key).is_some()
    }

    pub fn get_type(&self, section: &str, key: &str) -> ContentType {
        self.entry(section, key)
            .map(|entry| entry.content_type)
            .unwrap_or_default()
    }

    pub fn get_metadata(&self, section: &str, key: &str) -> Option<&Value> {
        self.entry(section, key)?.metadata.as_ref()
    }
}
