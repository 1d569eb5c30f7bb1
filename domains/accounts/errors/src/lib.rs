use common_errors::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access denied. No token provided.")]
    Unauthorized,
    #[error("Invalid token.")]
    Forbidden,
    #[error("Missing username or password")]
    MissingCredentials,
    #[error("User not found")]
    UnknownUser,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("OAuth login is not configured")]
    OAuthNotConfigured,
    #[error("OAuth login failed: {0}")]
    OAuthFailed(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::Unauthorized => {
                AppError::unauthorized("TOKEN_MISSING", &message)
            }
            AuthError::Forbidden => {
                AppError::forbidden("TOKEN_INVALID", &message)
            }
            AuthError::MissingCredentials => {
                AppError::bad_request("MISSING_CREDENTIALS", &message)
            }
            AuthError::UnknownUser => {
                AppError::bad_request("USER_NOT_FOUND", &message)
            }
            AuthError::InvalidCredentials => {
                AppError::bad_request("INVALID_CREDENTIALS", &message)
            }
            AuthError::UsernameTaken => {
                AppError::bad_request("USERNAME_TAKEN", &message)
            }
            AuthError::OAuthNotConfigured => {
                AppError::not_found("OAUTH_NOT_CONFIGURED", &message)
            }
            AuthError::OAuthFailed(_) => {
                AppError::bad_request("OAUTH_FAILED", &message)
            }
            AuthError::Unavailable(_) => {
                AppError::service_unavailable(&message)
            }
            AuthError::Internal(_) => {
                AppError::internal_server_error(&message)
            }
        }
    }
}
