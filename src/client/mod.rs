//! Client-side state for the admin inline editor, usable against the HTTP API
//! or any other [`CmsBackend`].

pub mod auth_session;
pub mod backend;
pub mod edit_mode;
pub mod http;
pub mod page_content;

pub use auth_session::AuthSession;
pub use backend::{ClientError, ClientResult, CmsBackend, CurrentUser};
pub use edit_mode::{ContentChange, EditSession, UNSAVED_CHANGES_PROMPT};
pub use http::HttpBackend;
pub use page_content::PageContent;
