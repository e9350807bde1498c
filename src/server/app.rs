use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{admin, auth, health, not_found, public};
use super::middleware::require_admin;
use crate::config::AuthConfig;
use crate::services::fallback::FallbackPolicy;
use crate::services::media_service::MAX_UPLOAD_BYTES;
use crate::services::{
    ApartmentService, ContentService, MediaService, NavigationService, NewsService, PageService,
    PricingService, SeasonService, SettingsService,
};
use crate::storage::MediaStorage;

/// Multipart framing adds a little on top of the file itself.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthConfig>,
    pub storage: MediaStorage,
    pub fallback: FallbackPolicy,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        auth: AuthConfig,
        storage: MediaStorage,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            db,
            auth: Arc::new(auth),
            storage,
            fallback,
        }
    }

    pub fn apartments(&self) -> ApartmentService {
        ApartmentService::new(self.db.clone())
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(self.db.clone())
    }

    pub fn media(&self) -> MediaService {
        MediaService::new(self.db.clone(), self.storage.clone())
    }

    pub fn navigation(&self) -> NavigationService {
        NavigationService::new(self.db.clone())
    }

    pub fn news(&self) -> NewsService {
        NewsService::new(self.db.clone())
    }

    pub fn pages(&self) -> PageService {
        PageService::new(self.db.clone())
    }

    pub fn pricing(&self) -> PricingService {
        PricingService::new(self.db.clone())
    }

    pub fn seasons(&self) -> SeasonService {
        SeasonService::new(self.db.clone())
    }

    pub fn settings(&self) -> SettingsService {
        SettingsService::new(self.db.clone())
    }
}

pub fn create_app(state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = match cors_origin {
        // Cookies only travel cross-origin with credentials, which rules out wildcards.
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/public", public_routes())
        .nest("/api/admin", admin_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/apartments", get(public::list_apartments))
        .route("/apartments/:slug", get(public::get_apartment))
        .route("/content/:page", get(public::get_page_content))
        .route("/pricing", get(public::get_pricing))
        .route("/pricing/quote", get(public::quote_stay))
        .route("/news", get(public::list_news))
        .route("/news/:slug", get(public::get_news))
        .route("/gallery", get(public::get_gallery))
        .route("/navigation", get(public::get_navigation))
        .route("/settings", get(public::get_settings))
        .route("/pages/:slug", get(public::get_page))
}

/// Everything below `/api/admin`, including unknown paths, sits behind the
/// admin guard.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Apartments
        .route(
            "/apartments",
            get(admin::apartments::list_apartments).post(admin::apartments::create_apartment),
        )
        .route(
            "/apartments/:id",
            get(admin::apartments::get_apartment)
                .put(admin::apartments::update_apartment)
                .delete(admin::apartments::delete_apartment),
        )
        // Pricing and seasons
        .route(
            "/pricing",
            get(admin::pricing::list_pricing).post(admin::pricing::create_pricing),
        )
        .route(
            "/pricing/:id",
            put(admin::pricing::update_pricing).delete(admin::pricing::delete_pricing),
        )
        .route(
            "/seasons",
            get(admin::seasons::list_seasons).post(admin::seasons::create_season),
        )
        .route(
            "/seasons/:id",
            put(admin::seasons::update_season).delete(admin::seasons::delete_season),
        )
        // Page content
        .route(
            "/content",
            get(admin::content::list_content).post(admin::content::upsert_content),
        )
        .route("/content/bulk", put(admin::content::bulk_save_content))
        .route("/content/:id", delete(admin::content::delete_content))
        // News
        .route(
            "/news",
            get(admin::news::list_news).post(admin::news::create_news),
        )
        .route(
            "/news/:id",
            get(admin::news::get_news)
                .put(admin::news::update_news)
                .delete(admin::news::delete_news),
        )
        // Media
        .route("/media", get(admin::media::list_media))
        .route(
            "/media/upload",
            post(admin::media::upload_media).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/media/reorder", post(admin::media::reorder_media))
        .route("/media/signed-url", get(admin::media::signed_url))
        .route(
            "/media/:id",
            put(admin::media::update_media).delete(admin::media::delete_media),
        )
        // Navigation
        .route(
            "/navigation",
            get(admin::navigation::list_navigation).post(admin::navigation::create_navigation_item),
        )
        .route(
            "/navigation/reorder",
            post(admin::navigation::reorder_navigation).put(admin::navigation::reorder_navigation),
        )
        .route(
            "/navigation/:id",
            put(admin::navigation::update_navigation_item)
                .delete(admin::navigation::delete_navigation_item),
        )
        // Settings
        .route(
            "/settings",
            get(admin::settings::list_settings).put(admin::settings::upsert_setting),
        )
        .route("/settings/:key", delete(admin::settings::delete_setting))
        // Pages
        .route(
            "/pages",
            get(admin::pages::list_pages).post(admin::pages::create_page),
        )
        .route(
            "/pages/:id",
            get(admin::pages::get_page)
                .put(admin::pages::update_page)
                .delete(admin::pages::delete_page),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state, require_admin))
}
