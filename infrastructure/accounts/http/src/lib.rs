//! Account endpoints: password registration and login, and the OAuth
//! redirect/callback pair.

mod provider;

use std::sync::Arc;

use account_command_handlers::{
    Authenticator, ExternalLoginHandler, LoginHandler, RegisterHandler,
};
use account_commands::{
    LoginCommand, RegisterCommand, RegisteredResponse, TokenResponse,
};
use account_errors::AuthError;
use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderName, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    response::{Json, Redirect},
    routing::{get, post},
};
use common_errors::AppError;
pub use provider::{GoogleOAuthConfig, GoogleProvider, IdentityProvider};
use serde::Deserialize;
use tracing::instrument;
use url::Url;
use utoipa::IntoParams;

/// Carries the issued OAuth state so the callback only completes in the
/// browser that started the login.
const STATE_COOKIE: &str = "oauth_state";
const STATE_COOKIE_ATTRIBUTES: &str =
    "HttpOnly; SameSite=Lax; Path=/api/auth/google";
const STATE_COOKIE_MAX_AGE_SECS: u64 = 600;

type WithCookie = ([(HeaderName, String); 1], Redirect);

fn state_cookie(state: &str) -> String {
    format!(
        "{STATE_COOKIE}={state}; Max-Age={STATE_COOKIE_MAX_AGE_SECS}; \
         {STATE_COOKIE_ATTRIBUTES}"
    )
}

fn expired_state_cookie() -> String {
    format!("{STATE_COOKIE}=; Max-Age=0; {STATE_COOKIE_ATTRIBUTES}")
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// A configured OAuth provider and where to send the browser afterwards.
#[derive(Clone)]
pub struct OAuthSettings {
    pub provider: Arc<dyn IdentityProvider>,
    pub frontend_url: Url,
}

#[derive(Clone)]
pub struct AuthServices {
    pub authenticator: Authenticator,
    pub register: RegisterHandler,
    pub login: LoginHandler,
    pub external_login: ExternalLoginHandler,
    pub oauth: Option<OAuthSettings>,
}

impl AuthServices {
    pub fn new(authenticator: Authenticator, oauth: Option<OAuthSettings>) -> Self {
        Self {
            register: RegisterHandler::new(authenticator.clone()),
            login: LoginHandler::new(authenticator.clone()),
            external_login: ExternalLoginHandler::new(authenticator.clone()),
            authenticator,
            oauth,
        }
    }

    fn oauth(&self) -> Result<&OAuthSettings, AuthError> {
        self.oauth.as_ref().ok_or(AuthError::OAuthNotConfigured)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined.
    pub error: Option<String>,
}

fn credentials_body<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> T {
    // A body that is not a credentials object is treated as empty, which the
    // handlers report as missing credentials.
    payload.map(|Json(command)| command).unwrap_or_default()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterCommand,
    responses(
        (status = 201, description = "Account created", body = RegisteredResponse),
        (status = 400, description = "Missing credentials or username taken", body = common_errors::ApiErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    State(services): State<AuthServices>,
    payload: Result<Json<RegisterCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisteredResponse>), AppError> {
    let response = services
        .register
        .execute(credentials_body(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginCommand,
    responses(
        (status = 200, description = "Session token issued", body = TokenResponse),
        (status = 400, description = "Unknown user or invalid credentials", body = common_errors::ApiErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    State(services): State<AuthServices>,
    payload: Result<Json<LoginCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let response = services.login.execute(credentials_body(payload)).await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/auth/google",
    responses(
        (status = 303, description = "Redirect to the provider's consent page; sets the `oauth_state` cookie"),
        (status = 404, description = "OAuth login is not configured", body = common_errors::ApiErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn google_login(
    State(services): State<AuthServices>,
) -> Result<WithCookie, AppError> {
    let oauth = services.oauth()?;
    let state = services
        .authenticator
        .tokens()
        .issue_state()
        .map_err(|err| AuthError::Internal(err.to_string()))?;

    Ok((
        [(SET_COOKIE, state_cookie(&state))],
        Redirect::to(oauth.provider.authorize_url(&state).as_str()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(OAuthCallbackParams),
    responses(
        (status = 303, description = "Redirect to the frontend with `token` or `error`"),
        (status = 404, description = "OAuth login is not configured", body = common_errors::ApiErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn google_callback(
    State(services): State<AuthServices>, headers: HeaderMap,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<WithCookie, AppError> {
    let oauth = services.oauth()?;
    let mut target = oauth.frontend_url.clone();
    let expected_state = cookie_value(&headers, STATE_COOKIE);

    match complete_oauth(&services, oauth, params, expected_state).await {
        Ok(token) => {
            target.query_pairs_mut().append_pair("token", &token);
        }
        Err(err) => {
            tracing::warn!("OAuth login failed: {}", err);
            target.query_pairs_mut().append_pair("error", "oauth_failed");
        }
    }

    Ok((
        [(SET_COOKIE, expired_state_cookie())],
        Redirect::to(target.as_str()),
    ))
}

async fn complete_oauth(
    services: &AuthServices, oauth: &OAuthSettings, params: OAuthCallbackParams,
    expected_state: Option<&str>,
) -> Result<String, AuthError> {
    if let Some(error) = params.error {
        return Err(AuthError::OAuthFailed(error));
    }
    let state = params
        .state
        .ok_or_else(|| AuthError::OAuthFailed("missing state".to_string()))?;
    if expected_state != Some(state.as_str()) {
        return Err(AuthError::OAuthFailed(
            "state does not match this browser".to_string(),
        ));
    }
    services
        .authenticator
        .tokens()
        .verify_state(&state)
        .map_err(|_| AuthError::OAuthFailed("invalid state".to_string()))?;
    let code = params
        .code
        .ok_or_else(|| AuthError::OAuthFailed("missing code".to_string()))?;

    let profile = oauth.provider.exchange(&code).await?;
    let response = services.external_login.execute(profile).await?;
    Ok(response.token)
}

/// Account routes, relative to their `/api/auth` mount point.
pub fn auth_router(services: AuthServices) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google", get(google_login))
        .route("/google/callback", get(google_callback))
        .with_state(services)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_cookie_value_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            COOKIE,
            HeaderValue::from_static("lang=en; oauth_state=abc.def; x=1"),
        );

        assert_eq!(cookie_value(&headers, STATE_COOKIE), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "missing"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), STATE_COOKIE), None);
    }

    #[test]
    fn test_state_cookie_is_scoped_and_short_lived() {
        let cookie = state_cookie("abc");

        assert!(cookie.starts_with("oauth_state=abc; Max-Age=600;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/api/auth/google"));
        assert!(expired_state_cookie().contains("Max-Age=0"));
    }
}
