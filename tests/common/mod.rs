//! Shared setup for the HTTP integration tests.
#![allow(dead_code)]

use anyhow::Result;
use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use czaplisko::auth::token::generate_token;
use czaplisko::config::AuthConfig;
use czaplisko::database::connection::{setup_database, sqlite_url};
use czaplisko::server::app::{create_app, AppState};
use czaplisko::services::fallback::FallbackPolicy;
use czaplisko::storage::MediaStorage;
use sea_orm::DatabaseConnection;
use tempfile::NamedTempFile;

pub const JWT_SECRET: &str = "integration-test-secret-with-32-plus-chars";
pub const ADMIN_EMAIL: &str = "admin@czaplisko.pl";
pub const ADMIN_PASSWORD: &str = "bardzo-tajne-haslo";
pub const PUBLIC_URL: &str = "https://cdn.czapliskosiedlisko.pl";

pub struct TestApp {
    pub server: TestServer,
    pub db: DatabaseConnection,
    pub storage: MediaStorage,
    pub state: AppState,
    _db_file: NamedTempFile,
}

impl TestApp {
    /// `Authorization: Bearer` header for a freshly signed admin token.
    pub fn admin_auth(&self) -> (HeaderName, HeaderValue) {
        let token = generate_token(ADMIN_EMAIL, JWT_SECRET).expect("token");
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("header"),
        )
    }

    pub fn admin_get(&self, path: &str) -> TestRequest {
        let (name, value) = self.admin_auth();
        self.server.get(path).add_header(name, value)
    }

    pub fn admin_post(&self, path: &str) -> TestRequest {
        let (name, value) = self.admin_auth();
        self.server.post(path).add_header(name, value)
    }

    pub fn admin_put(&self, path: &str) -> TestRequest {
        let (name, value) = self.admin_auth();
        self.server.put(path).add_header(name, value)
    }

    pub fn admin_delete(&self, path: &str) -> TestRequest {
        let (name, value) = self.admin_auth();
        self.server.delete(path).add_header(name, value)
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: JWT_SECRET.to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        // Low cost keeps the suite fast.
        admin_password_hash: bcrypt::hash(ADMIN_PASSWORD, 4).expect("hash"),
        cookie_secure: false,
    }
}

pub async fn test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db = setup_database(&sqlite_url(&temp_file.path().display().to_string())).await?;
    Ok((db, temp_file))
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(FallbackPolicy::Strict).await
}

pub async fn spawn_app_with(fallback: FallbackPolicy) -> Result<TestApp> {
    build_app(fallback, auth_config()).await
}

pub async fn spawn_app_with_auth(auth: AuthConfig) -> Result<TestApp> {
    build_app(FallbackPolicy::Strict, auth).await
}

async fn build_app(fallback: FallbackPolicy, auth: AuthConfig) -> Result<TestApp> {
    let (db, db_file) = test_db().await?;
    let storage = MediaStorage::in_memory(PUBLIC_URL);
    let state = AppState::new(db.clone(), auth, storage.clone(), fallback);
    let app = create_app(state.clone(), None)?;
    let server = TestServer::new(app)?;

    Ok(TestApp {
        server,
        db,
        storage,
        state,
        _db_file: db_file,
    })
}
