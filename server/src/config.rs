use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use account_http::GoogleOAuthConfig;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Server configuration, read from the environment (after `.env`) or flags.
#[derive(Debug, Clone, Parser)]
#[command(name = "archivist", about = "Validated document API")]
pub struct ArchivistConfig {
    /// PostgreSQL connection string; documents are kept in memory without it
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_POOL_MAX")]
    pub db_pool_max: Option<u32>,

    /// Secret used to sign session tokens (min 32 chars)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: SecretString,

    #[arg(long, env = "TOKEN_EXPIRY_MINUTES", default_value = "60")]
    pub token_expiry_minutes: u64,

    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    pub google_client_id: Option<String>,

    #[arg(long, env = "GOOGLE_CLIENT_SECRET")]
    pub google_client_secret: Option<SecretString>,

    #[arg(long, env = "GOOGLE_CALLBACK_URL")]
    pub google_callback_url: Option<String>,

    /// Where the OAuth callback sends the browser with `token` or `error`
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    pub frontend_url: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// `development` exposes internal error detail in responses
    #[arg(long, env = "APP_ENV", default_value = "production")]
    pub app_env: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT secret must be at least {MIN_JWT_SECRET_LEN} characters")]
    JwtSecretTooShort,
    #[error("Token expiry must be > 0 minutes")]
    InvalidTokenExpiry,
    #[error("Database pool max must be > 0")]
    InvalidPoolSize,
    #[error("Google OAuth needs client id, client secret and callback URL")]
    IncompleteOAuth,
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { name, source })
}

impl ArchivistConfig {
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::JwtSecretTooShort);
        }
        if self.token_expiry_minutes == 0 {
            return Err(ConfigError::InvalidTokenExpiry);
        }
        if self.db_pool_max == Some(0) {
            return Err(ConfigError::InvalidPoolSize);
        }
        self.frontend_url()?;
        self.google_oauth()?;
        Ok(())
    }

    pub fn frontend_url(&self) -> Result<Url, ConfigError> {
        parse_url("FRONTEND_URL", &self.frontend_url)
    }

    /// `None` when no Google setting is present; all three or none.
    pub fn google_oauth(&self) -> Result<Option<GoogleOAuthConfig>, ConfigError> {
        match (
            &self.google_client_id,
            &self.google_client_secret,
            &self.google_callback_url,
        ) {
            (None, None, None) => Ok(None),
            (Some(client_id), Some(client_secret), Some(callback_url)) => {
                Ok(Some(GoogleOAuthConfig {
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    callback_url: parse_url(
                        "GOOGLE_CALLBACK_URL",
                        callback_url,
                    )?,
                }))
            }
            _ => Err(ConfigError::IncompleteOAuth),
        }
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}
