//! Handlers mounted under `/api/admin`. The router wraps all of them in
//! [`require_admin`](crate::server::middleware::require_admin).

pub mod apartments;
pub mod content;
pub mod media;
pub mod navigation;
pub mod news;
pub mod pages;
pub mod pricing;
pub mod seasons;
pub mod settings;
