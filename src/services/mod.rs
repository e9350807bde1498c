pub mod apartment_service;
pub mod content_service;
pub mod fallback;
pub mod media_service;
pub mod navigation_service;
pub mod news_service;
pub mod page_service;
pub mod pricing_service;
pub mod season_service;
pub mod settings_service;
pub mod slug;
pub mod validation;

pub use apartment_service::ApartmentService;
pub use content_service::ContentService;
pub use media_service::MediaService;
pub use navigation_service::NavigationService;
pub use news_service::NewsService;
pub use page_service::PageService;
pub use pricing_service::PricingService;
pub use season_service::SeasonService;
pub use settings_service::SettingsService;
