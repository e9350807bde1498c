use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::token::TOKEN_TTL_DAYS;

pub const AUTH_COOKIE: &str = "auth_token";

pub fn auth_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(TOKEN_TTL_DAYS))
        .path("/")
        .build()
}

pub fn set_auth_cookie(jar: CookieJar, token: String, secure: bool) -> CookieJar {
    jar.add(auth_cookie(token, secure))
}

/// Always emits an expired cookie, whether or not the request carried one.
pub fn clear_auth_cookie(jar: CookieJar) -> CookieJar {
    let expired = Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .path("/")
        .build();
    jar.add(expired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes() {
        let rendered = auth_cookie("abc".to_string(), false).to_string();
        assert!(rendered.starts_with("auth_token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
        assert!(!rendered.contains("Secure"));

        assert!(auth_cookie("abc".to_string(), true).to_string().contains("Secure"));
    }

    #[test]
    fn clearing_without_a_cookie_still_expires_it() {
        let jar = clear_auth_cookie(CookieJar::new());
        let cookie = jar.get(AUTH_COOKIE).expect("expired cookie");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
