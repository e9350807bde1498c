use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::auth::{authenticated_user, AdminIdentity};
use crate::errors::CmsError;
use crate::server::app::AppState;

/// Guards the admin router. The verified identity is stored in the request
/// extensions for handlers that want it.
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, CmsError> {
    let claims = authenticated_user(&jar, req.headers(), &state.auth.jwt_secret).ok_or_else(|| {
        debug!("Rejected unauthenticated request to {}", req.uri().path());
        CmsError::unauthorized("Authentication required")
    })?;

    req.extensions_mut().insert(AdminIdentity::from(claims));
    Ok(next.run(req).await)
}
