use axum::{extract::State, http::HeaderMap, response::Json};
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::cookie::{clear_auth_cookie, set_auth_cookie};
use crate::auth::password::verify_password;
use crate::auth::token::generate_token;
use crate::auth::authenticated_user;
use crate::errors::{CmsError, CmsResult};
use crate::server::app::AppState;
use crate::server::middleware::ValidatedJson;
use crate::server::requests::LoginRequest;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> CmsResult<(CookieJar, Json<Value>)> {
    let email_ok = request.email == state.auth.admin_email;

    // Verified for unknown emails too, so both rejections take equally long.
    // bcrypt at cost 12 blocks for a noticeable time.
    let password_hash = state.auth.admin_password_hash.clone();
    let password = request.password;
    let password_ok =
        tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| CmsError::internal("Login failed").with_source(e))?;

    if !email_ok {
        warn!("Login rejected for unknown email");
        return Err(CmsError::unauthorized(INVALID_CREDENTIALS));
    }
    if !password_ok {
        warn!("Login rejected: wrong password");
        return Err(CmsError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = generate_token(&request.email, &state.auth.jwt_secret)
        .map_err(|e| CmsError::internal("Login failed").with_source(e))?;
    info!("Admin logged in");

    let jar = set_auth_cookie(jar, token, state.auth.cookie_secure);
    Ok((
        jar,
        Json(json!({
            "success": true,
            "user": { "email": request.email }
        })),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (clear_auth_cookie(jar), Json(json!({ "success": true })))
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> CmsResult<Json<Value>> {
    let claims = authenticated_user(&jar, &headers, &state.auth.jwt_secret)
        .ok_or_else(|| CmsError::unauthorized("Unauthorized"))?;
    Ok(Json(json!({ "email": claims.email })))
}
