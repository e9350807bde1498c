pub mod apartments;
pub mod common_types;
pub mod global_settings;
pub mod media;
pub mod navigation_items;
pub mod news;
pub mod page_content;
pub mod pages;
pub mod pricing;
pub mod season_ranges;

pub use common_types::{ContentType, MediaCategory, PublishStatus, SeasonType, UnknownVariant};
