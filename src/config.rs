//! Runtime configuration.
//!
//! Every setting is read from a CLI flag with an environment-variable fallback
//! (a `.env` file is honoured via `dotenvy` in `main`). [`AppConfig::from_args`]
//! validates the whole set up front and reports every problem at once, so the
//! server never boots half-configured.

use clap::Args;
use thiserror::Error;
use url::Url;

use crate::services::fallback::FallbackPolicy;
use crate::services::validation::is_valid_email;

pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    #[arg(long, env = "DATABASE_URL", default_value = "")]
    pub database_url: String,
    #[arg(long, env = "JWT_SECRET", default_value = "", hide_env_values = true)]
    pub jwt_secret: String,
    #[arg(long, env = "ADMIN_EMAIL", default_value = "")]
    pub admin_email: String,
    #[arg(long, env = "ADMIN_PASSWORD_HASH", default_value = "", hide_env_values = true)]
    pub admin_password_hash: String,
    #[arg(long, env = "R2_ACCOUNT_ID", default_value = "")]
    pub r2_account_id: String,
    #[arg(long, env = "R2_ACCESS_KEY_ID", default_value = "", hide_env_values = true)]
    pub r2_access_key_id: String,
    #[arg(long, env = "R2_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true)]
    pub r2_secret_access_key: String,
    #[arg(long, env = "R2_BUCKET_PUBLIC", default_value = "")]
    pub r2_bucket_public: String,
    #[arg(long, env = "R2_BUCKET_PRIVATE", default_value = "")]
    pub r2_bucket_private: String,
    #[arg(long, env = "R2_PUBLIC_URL", default_value = "")]
    pub r2_public_url: String,
    #[arg(long, env = "COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,
    #[arg(long, env = "PUBLIC_FALLBACK", value_enum, default_value_t = FallbackPolicy::Strict)]
    pub public_fallback: FallbackPolicy,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password_hash: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_public: String,
    pub bucket_private: String,
    pub public_url: String,
}

impl R2Config {
    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
    pub r2: R2Config,
    pub public_fallback: FallbackPolicy,
}

impl AppConfig {
    pub fn from_args(args: ConfigArgs) -> Result<Self, ConfigError> {
        validate_args(&args)?;

        Ok(Self {
            database_url: args.database_url,
            auth: AuthConfig {
                jwt_secret: args.jwt_secret,
                admin_email: args.admin_email,
                admin_password_hash: args.admin_password_hash,
                cookie_secure: args.cookie_secure,
            },
            r2: R2Config {
                account_id: args.r2_account_id,
                access_key_id: args.r2_access_key_id,
                secret_access_key: args.r2_secret_access_key,
                bucket_public: args.r2_bucket_public,
                bucket_private: args.r2_bucket_private,
                public_url: args.r2_public_url.trim_end_matches('/').to_string(),
            },
            public_fallback: args.public_fallback,
        })
    }
}

fn validate_args(args: &ConfigArgs) -> Result<(), ConfigError> {
    let mut problems = Vec::new();

    let required = [
        ("DATABASE_URL", &args.database_url),
        ("ADMIN_PASSWORD_HASH", &args.admin_password_hash),
        ("R2_ACCOUNT_ID", &args.r2_account_id),
        ("R2_ACCESS_KEY_ID", &args.r2_access_key_id),
        ("R2_SECRET_ACCESS_KEY", &args.r2_secret_access_key),
        ("R2_BUCKET_PUBLIC", &args.r2_bucket_public),
        ("R2_BUCKET_PRIVATE", &args.r2_bucket_private),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            problems.push(format!("{}: {} is required", name, name));
        }
    }

    if args.jwt_secret.chars().count() < MIN_JWT_SECRET_LEN {
        problems.push(format!(
            "JWT_SECRET: JWT_SECRET must be at least {} characters",
            MIN_JWT_SECRET_LEN
        ));
    }

    if !is_valid_email(&args.admin_email) {
        problems.push("ADMIN_EMAIL: ADMIN_EMAIL must be a valid email".to_string());
    }

    if Url::parse(&args.r2_public_url).is_err() {
        problems.push("R2_PUBLIC_URL: R2_PUBLIC_URL must be a valid URL".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        for problem in &problems {
            tracing::error!("  - {}", problem);
        }
        Err(ConfigError::Invalid(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_args() -> ConfigArgs {
        ConfigArgs {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "x".repeat(32),
            admin_email: "admin@czaplisko.pl".to_string(),
            admin_password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            r2_account_id: "account".to_string(),
            r2_access_key_id: "key".to_string(),
            r2_secret_access_key: "secret".to_string(),
            r2_bucket_public: "public".to_string(),
            r2_bucket_private: "private".to_string(),
            r2_public_url: "https://cdn.czapliskosiedlisko.pl/".to_string(),
            cookie_secure: true,
            public_fallback: FallbackPolicy::Strict,
        }
    }

    #[test]
    fn accepts_complete_configuration() {
        let config = AppConfig::from_args(complete_args()).expect("valid config");
        assert_eq!(config.r2.public_url, "https://cdn.czapliskosiedlisko.pl");
        assert_eq!(config.r2.endpoint(), "https://account.r2.cloudflarestorage.com");
        assert!(config.auth.cookie_secure);
    }

    #[test]
    fn reports_every_problem_together() {
        let mut args = complete_args();
        args.jwt_secret = "short".to_string();
        args.admin_email = "not-an-email".to_string();
        args.r2_bucket_private = String::new();
        args.r2_public_url = "cdn".to_string();

        let ConfigError::Invalid(problems) = AppConfig::from_args(args).unwrap_err();
        assert_eq!(problems.len(), 4);
        assert!(problems.iter().any(|p| p.starts_with("JWT_SECRET")));
        assert!(problems.iter().any(|p| p.starts_with("ADMIN_EMAIL")));
        assert!(problems.iter().any(|p| p.starts_with("R2_BUCKET_PRIVATE")));
        assert!(problems.iter().any(|p| p.starts_with("R2_PUBLIC_URL")));
    }

    #[test]
    fn empty_environment_is_rejected() {
        let ConfigError::Invalid(problems) =
            AppConfig::from_args(ConfigArgs::default()).unwrap_err();
        assert!(problems.len() >= 10);
    }
}
