use account_command_handlers::{Authenticator, Credential};
use account_errors::AuthError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use common_errors::AppError;

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Unauthorized)
}

/// Rejects the request unless it carries a valid session token; the decoded
/// `Identity` is stored in the request extensions.
pub async fn require_bearer(
    State(authenticator): State<Authenticator>, mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let identity = authenticator.verify(Credential::Bearer(token)).await?;

    tracing::debug!(username = %identity.username, "Bearer token accepted");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
