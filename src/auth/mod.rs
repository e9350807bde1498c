//! Single-administrator authentication.
//!
//! Credentials live in configuration (`ADMIN_EMAIL`, `ADMIN_PASSWORD_HASH`).
//! A successful login issues a JWT, delivered as an HttpOnly cookie; API
//! clients may send the same token as a bearer header instead.

pub mod cookie;
pub mod password;
pub mod token;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use self::cookie::AUTH_COOKIE;
use self::token::{verify_token, Claims};

/// The authenticated administrator, attached to admin requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub email: String,
}

impl From<Claims> for AdminIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
        }
    }
}

/// Cookie first, then `Authorization: Bearer <token>`.
pub fn token_from_request(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn authenticated_user(jar: &CookieJar, headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = token_from_request(jar, headers)?;
    verify_token(&token, secret)
}
