use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs an HS256 token for `email`, valid for seven days.
pub fn generate_token(email: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Expired, tampered and malformed tokens all yield `None`.
pub fn verify_token(token: &str, secret: &str) -> Option<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-at-least-32-chars";

    #[test]
    fn issued_tokens_verify() {
        let token = generate_token("admin@czaplisko.pl", SECRET).unwrap();
        let claims = verify_token(&token, SECRET).expect("valid token");
        assert_eq!(claims.email, "admin@czaplisko.pl");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 3600);
    }

    #[test]
    fn wrong_secret_and_garbage_are_rejected() {
        let token = generate_token("admin@czaplisko.pl", SECRET).unwrap();
        assert!(verify_token(&token, "another-secret-that-is-32-chars-long").is_none());
        assert!(verify_token("not.a.token", SECRET).is_none());

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(verify_token(&tampered, SECRET).is_none());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let past = Utc::now() - Duration::days(8);
        let claims = Claims {
            email: "admin@czaplisko.pl".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::days(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, SECRET).is_none());
    }
}
