//! Inline edit mode: admin detection, staged content changes and the bulk save
//! that flushes them.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{error, info, warn};

use super::backend::CmsBackend;
use super::page_content::PageContent;
use crate::database::entities::ContentType;
use crate::server::requests::ContentItemRequest;

/// Asked before staged edits are thrown away.
pub const UNSAVED_CHANGES_PROMPT: &str =
    "Masz niezapisane zmiany. Czy na pewno chcesz je odrzucić?";

/// A staged edit; the same shape the bulk endpoint accepts.
pub type ContentChange = ContentItemRequest;

fn change_key(page: &str, section: &str, key: &str) -> String {
    format!("{}:{}:{}", page, section, key)
}

/// One browser session's editor state. Staged changes keep their first
/// registration order; re-registering a key replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    is_admin: bool,
    admin_email: String,
    edit_mode: bool,
    pending: IndexMap<String, ContentChange>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_changes(&self) -> impl Iterator<Item = &ContentChange> {
        self.pending.values()
    }

    pub fn pending_change(&self, page: &str, section: &str, key: &str) -> Option<&ContentChange> {
        self.pending.get(&change_key(page, section, key))
    }

    /// Any failure, including a network error, counts as "not an admin" and
    /// switches edit mode off.
    pub async fn check_admin_status(&mut self, backend: &dyn CmsBackend) -> bool {
        match backend.me().await {
            Ok(user) => {
                self.is_admin = true;
                self.admin_email = user.email;
            }
            Err(_) => {
                self.is_admin = false;
                self.admin_email.clear();
                self.edit_mode = false;
            }
        }
        self.is_admin
    }

    /// Leaving edit mode with staged changes discards them, but only once
    /// `confirm` agrees. Returns whether the mode changed.
    pub fn toggle_edit_mode(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if self.edit_mode && self.is_dirty() {
            if !confirm(UNSAVED_CHANGES_PROMPT) {
                return false;
            }
            self.discard_changes();
        }
        self.edit_mode = !self.edit_mode;
        true
    }

    pub fn enable_edit_mode(&mut self) {
        self.edit_mode = true;
    }

    pub fn disable_edit_mode(&mut self) {
        self.edit_mode = false;
    }

    pub fn register_change(
        &mut self,
        page: &str,
        section: &str,
        key: &str,
        value: impl Into<String>,
        content_type: ContentType,
        metadata: Option<Value>,
    ) {
        self.pending.insert(
            change_key(page, section, key),
            ContentChange {
                page: page.to_string(),
                section: section.to_string(),
                key: key.to_string(),
                value: value.into(),
                content_type,
                metadata,
            },
        );
    }

    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    /// Sends every staged change in one bulk request. Staged state is cleared
    /// only after the server accepted the batch, then `pages` are reloaded.
    pub async fn save_all_changes(
        &mut self,
        backend: &dyn CmsBackend,
        pages: &mut [PageContent],
    ) -> bool {
        if self.pending.is_empty() {
            return true;
        }

        let items: Vec<ContentChange> = self.pending.values().cloned().collect();
        match backend.bulk_save(items).await {
            Ok(result) => {
                info!("Saved {} content changes", result.count);
                self.discard_changes();
                refresh_pages(backend, pages).await;
                true
            }
            Err(e) => {
                error!("Failed to save changes: {}", e);
                false
            }
        }
    }

    /// Drops staged changes, leaves edit mode and reloads `pages`. With
    /// unsaved changes `confirm` must agree first; returns `false` if it did not.
    pub async fn cancel_editing(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
        backend: &dyn CmsBackend,
        pages: &mut [PageContent],
    ) -> bool {
        if self.is_dirty() && !confirm(UNSAVED_CHANGES_PROMPT) {
            return false;
        }
        self.discard_changes();
        self.disable_edit_mode();
        refresh_pages(backend, pages).await;
        true
    }
}

async fn refresh_pages(backend: &dyn CmsBackend, pages: &mut [PageContent]) {
    for page in pages.iter_mut() {
        if let Err(e) = page.refresh(backend).await {
            warn!("Failed to refresh content for page {}: {}", page.page(), e);
        }
    }
}
