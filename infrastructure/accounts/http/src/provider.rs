use account_errors::AuthError;
use account_models::ExternalProfile;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

const GOOGLE_AUTHORIZE_URL: &str =
    "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str =
    "https://openidconnect.googleapis.com/v1/userinfo";

/// An OAuth 2.0 authorization-code provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start a login carrying `state`.
    fn authorize_url(&self, state: &str) -> Url;

    /// Trades an authorization code for the caller's profile.
    async fn exchange(&self, code: &str) -> Result<ExternalProfile, AuthError>;
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub callback_url: Url,
}

pub struct GoogleProvider {
    config: GoogleOAuthConfig,
    authorize_endpoint: Url,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
}

#[derive(Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

impl GoogleProvider {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            config,
            authorize_endpoint: Url::parse(GOOGLE_AUTHORIZE_URL)?,
            client: reqwest::Client::new(),
        })
    }
}

fn oauth_failure(err: reqwest::Error) -> AuthError {
    AuthError::OAuthFailed(err.to_string())
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.callback_url.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", "profile email")
            .append_pair("state", state);
        url
    }

    async fn exchange(&self, code: &str) -> Result<ExternalProfile, AuthError> {
        let grant: TokenGrant = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(oauth_failure)?
            .json()
            .await
            .map_err(oauth_failure)?;

        let info: GoogleUserInfo = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&grant.access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(oauth_failure)?
            .json()
            .await
            .map_err(oauth_failure)?;

        if info.sub.trim().is_empty() {
            return Err(AuthError::OAuthFailed(
                "provider returned no account id".to_string(),
            ));
        }

        Ok(ExternalProfile {
            provider_id: info.sub,
            email: info.email,
            display_name: info.name,
        })
    }
}
