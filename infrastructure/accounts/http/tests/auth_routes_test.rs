use std::sync::Arc;

use account_command_handlers::Authenticator;
use account_dao::MemoryAccountStore;
use account_errors::AuthError;
use account_http::{AuthServices, IdentityProvider, OAuthSettings, auth_router};
use account_models::ExternalProfile;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use test_utils::tokens;
use tower::ServiceExt;
use url::Url;

struct StubProvider {
    profile: Option<ExternalProfile>,
}

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorize_url(&self, state: &str) -> Url {
        let mut url = Url::parse("https://provider.test/authorize").unwrap();
        url.query_pairs_mut()
            .append_pair("scope", "profile email")
            .append_pair("state", state);
        url
    }

    async fn exchange(&self, code: &str) -> Result<ExternalProfile, AuthError> {
        match (&self.profile, code) {
            (Some(profile), "good-code") => Ok(profile.clone()),
            _ => Err(AuthError::OAuthFailed("code rejected".to_string())),
        }
    }
}

fn authenticator() -> Authenticator {
    Authenticator::new(Arc::new(MemoryAccountStore::new()), tokens::token_issuer())
}

fn app(oauth: Option<OAuthSettings>) -> Router {
    auth_router(AuthServices::new(authenticator(), oauth))
}

fn oauth_app(profile: Option<ExternalProfile>) -> Router {
    app(Some(OAuthSettings {
        provider: Arc::new(StubProvider { profile }),
        frontend_url: Url::parse("http://localhost:5173/auth").unwrap(),
    }))
}

fn grace() -> ExternalProfile {
    ExternalProfile {
        provider_id: "google-42".to_string(),
        email: Some("grace@example.com".to_string()),
        display_name: Some("Grace".to_string()),
    }
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

struct Redirected {
    status: StatusCode,
    location: Option<String>,
    set_cookie: Option<String>,
}

async fn get_with_cookie(
    app: &Router, uri: &str, cookie: Option<&str>,
) -> Redirected {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let header_text = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .map(|value| value.to_str().unwrap().to_string())
    };
    Redirected {
        status: response.status(),
        location: header_text(header::LOCATION),
        set_cookie: header_text(header::SET_COOKIE),
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>) {
    let response = get_with_cookie(app, uri, None).await;
    (response.status, response.location)
}

/// Runs the callback as the browser that was handed `state`.
async fn callback(app: &Router, query: &str, state: &str) -> Redirected {
    get_with_cookie(
        app,
        &format!("/google/callback?{query}"),
        Some(&format!("oauth_state={state}")),
    )
    .await
}

fn query_value(location: &str, key: &str) -> Option<String> {
    Url::parse(location)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn test_register_then_login() {
    let app = app(None);
    let credentials = json!({"username": "ada", "password": "analytical"});

    let (status, body) =
        post_json(&app, "/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered");

    let (status, body) = post_json(&app, "/login", credentials).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    let identity = tokens::token_issuer().verify(token).unwrap();
    assert_eq!(identity.username, "ada");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_missing_fields() {
    let app = app(None);
    let credentials = json!({"username": "ada", "password": "analytical"});
    post_json(&app, "/register", credentials.clone()).await;

    let (status, body) = post_json(&app, "/register", credentials).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Username already taken");

    let (status, body) =
        post_json(&app, "/register", json!({"username": "bob"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing username or password");
}

#[tokio::test]
async fn test_login_failures_issue_no_token() {
    let app = app(None);
    post_json(
        &app,
        "/register",
        json!({"username": "ada", "password": "analytical"}),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/login",
        json!({"username": "ada", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid credentials");
    assert!(body.get("token").is_none());

    let (status, body) = post_json(
        &app,
        "/login",
        json!({"username": "nobody", "password": "analytical"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "User not found");
}

#[tokio::test]
async fn test_oauth_routes_are_absent_when_unconfigured() {
    let app = app(None);

    let (start, _) = get(&app, "/google").await;
    let (callback, _) = get(&app, "/google/callback?code=x&state=y").await;

    assert_eq!(start, StatusCode::NOT_FOUND);
    assert_eq!(callback, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_google_login_redirects_with_signed_state() {
    let app = oauth_app(Some(grace()));

    let (status, location) = get(&app, "/google").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.unwrap();
    assert!(location.starts_with("https://provider.test/authorize"));
    assert_eq!(
        query_value(&location, "scope").as_deref(),
        Some("profile email")
    );
    let state = query_value(&location, "state").unwrap();
    assert!(tokens::token_issuer().verify_state(&state).is_ok());
}

#[tokio::test]
async fn test_google_login_binds_state_to_the_browser() {
    let app = oauth_app(Some(grace()));

    let started = get_with_cookie(&app, "/google", None).await;

    let state = query_value(&started.location.unwrap(), "state").unwrap();
    let cookie = started.set_cookie.unwrap();
    assert!(cookie.starts_with(&format!("oauth_state={state};")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_full_oauth_round_trip_in_one_browser() {
    let app = oauth_app(Some(grace()));
    let started = get_with_cookie(&app, "/google", None).await;
    let state = query_value(&started.location.unwrap(), "state").unwrap();
    let cookie = started.set_cookie.unwrap();
    let cookie = cookie.split(';').next().unwrap();

    let finished = get_with_cookie(
        &app,
        &format!("/google/callback?code=good-code&state={state}"),
        Some(cookie),
    )
    .await;

    assert!(query_value(&finished.location.unwrap(), "token").is_some());
    assert!(finished.set_cookie.unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_callback_rejects_state_from_another_browser() {
    let app = oauth_app(Some(grace()));
    let issuer = tokens::token_issuer();
    let victim_state = issuer.issue_state().unwrap();
    let attacker_state = issuer.issue_state().unwrap();
    let query = format!("code=good-code&state={attacker_state}");

    let without_cookie =
        get(&app, &format!("/google/callback?{query}")).await.1;
    let mismatched = callback(&app, &query, &victim_state).await.location;

    for location in [without_cookie, mismatched] {
        assert_eq!(
            location.as_deref(),
            Some("http://localhost:5173/auth?error=oauth_failed")
        );
    }
}

#[tokio::test]
async fn test_callback_redirects_to_frontend_with_token() {
    let app = oauth_app(Some(grace()));
    let state = tokens::token_issuer().issue_state().unwrap();

    let response =
        callback(&app, &format!("code=good-code&state={state}"), &state).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.location.unwrap();
    assert!(location.starts_with("http://localhost:5173/auth?token="));
    let token = query_value(&location, "token").unwrap();
    let identity = tokens::token_issuer().verify(&token).unwrap();
    assert_eq!(identity.username, "grace@example.com");
}

#[tokio::test]
async fn test_callback_failures_redirect_with_error() {
    let app = oauth_app(Some(grace()));
    let state = tokens::token_issuer().issue_state().unwrap();
    let session = tokens::bearer(&tokens::token_issuer(), "ada");
    let session = session.trim_start_matches("Bearer ");

    for (query, cookie_state) in [
        (format!("code=bad-code&state={state}"), state.as_str()),
        ("code=good-code&state=forged".to_string(), "forged"),
        (format!("code=good-code&state={session}"), session),
        ("code=good-code".to_string(), state.as_str()),
        ("error=access_denied".to_string(), state.as_str()),
    ] {
        let response = callback(&app, &query, cookie_state).await;

        assert_eq!(response.status, StatusCode::SEE_OTHER, "{query}");
        assert_eq!(
            response.location.as_deref(),
            Some("http://localhost:5173/auth?error=oauth_failed"),
            "{query}"
        );
    }
}

#[tokio::test]
async fn test_callback_rejects_profiles_without_email() {
    let app = oauth_app(Some(ExternalProfile {
        email: None,
        ..grace()
    }));
    let state = tokens::token_issuer().issue_state().unwrap();

    let response =
        callback(&app, &format!("code=good-code&state={state}"), &state).await;

    assert_eq!(
        query_value(&response.location.unwrap(), "error").as_deref(),
        Some("oauth_failed")
    );
}
