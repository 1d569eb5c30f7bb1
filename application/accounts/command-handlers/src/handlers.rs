use account_commands::{
    LoginCommand, RegisterCommand, RegisteredResponse, TokenResponse,
};
use account_errors::AuthError;
use account_models::{ExternalProfile, NewAccount};
use database_traits::StoreError;
use session_tokens::password;
use tracing::instrument;

use crate::authenticator::{Authenticator, Credential, storage_error};

#[derive(Clone)]
pub struct RegisterHandler {
    authenticator: Authenticator,
}

impl RegisterHandler {
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: RegisterCommand,
    ) -> Result<RegisteredResponse, AuthError> {
        let (username, secret) = command
            .credentials()
            .ok_or(AuthError::MissingCredentials)?;

        let secret = secret.to_string();
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash(&secret))
                .await
                .map_err(|err| AuthError::Internal(err.to_string()))?
                .map_err(|err| AuthError::Internal(err.to_string()))?;

        let account = self
            .authenticator
            .accounts()
            .insert(NewAccount {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|err| {
                match err {
                    StoreError::Duplicate { .. } => AuthError::UsernameTaken,
                    other => storage_error(other),
                }
            })?;

        tracing::info!("Account registered: {}", account.id);
        Ok(RegisteredResponse::registered())
    }
}

#[derive(Clone)]
pub struct LoginHandler {
    authenticator: Authenticator,
}

impl LoginHandler {
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: LoginCommand,
    ) -> Result<TokenResponse, AuthError> {
        let (username, password) = command
            .credentials()
            .ok_or(AuthError::MissingCredentials)?;

        let token = self
            .authenticator
            .sign_in(Credential::Password { username, password })
            .await?;

        Ok(TokenResponse { token })
    }
}

#[derive(Clone)]
pub struct ExternalLoginHandler {
    authenticator: Authenticator,
}

impl ExternalLoginHandler {
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, profile: ExternalProfile,
    ) -> Result<TokenResponse, AuthError> {
        let token = self
            .authenticator
            .sign_in(Credential::External(&profile))
            .await?;

        Ok(TokenResponse { token })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use account_dao::MemoryAccountStore;
    use test_utils::tokens::token_issuer;

    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(MemoryAccountStore::new()), token_issuer())
    }

    fn register(username: &str, password: &str) -> RegisterCommand {
        RegisterCommand {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn login(username: &str, password: &str) -> LoginCommand {
        LoginCommand {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = authenticator();
        let registered = RegisterHandler::new(auth.clone())
            .execute(register("ada", "analytical"))
            .await
            .unwrap();

        let response = LoginHandler::new(auth.clone())
            .execute(login("ada", "analytical"))
            .await
            .unwrap();

        assert_eq!(registered.message, "User registered");
        let identity = auth.tokens().verify(&response.token).unwrap();
        assert_eq!(identity.username, "ada");
    }

    #[tokio::test]
    async fn test_register_requires_both_fields() {
        let handler = RegisterHandler::new(authenticator());

        let result = handler
            .execute(RegisterCommand {
                username: Some("ada".to_string()),
                password: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let handler = RegisterHandler::new(authenticator());
        handler.execute(register("ada", "one")).await.unwrap();

        let result = handler.execute(register("ada", "two")).await;

        assert!(matches!(result, Err(AuthError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_issues_no_token() {
        let auth = authenticator();
        RegisterHandler::new(auth.clone())
            .execute(register("ada", "analytical"))
            .await
            .unwrap();

        let result = LoginHandler::new(auth)
            .execute(login("ada", "difference"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_external_login_creates_account_once() {
        let auth = authenticator();
        let handler = ExternalLoginHandler::new(auth.clone());
        let profile = ExternalProfile {
            provider_id: "g-42".to_string(),
            email: Some("grace@example.com".to_string()),
            display_name: Some("Grace".to_string()),
        };

        let first = handler.execute(profile.clone()).await.unwrap();
        let second = handler.execute(profile).await.unwrap();

        let a = auth.tokens().verify(&first.token).unwrap();
        let b = auth.tokens().verify(&second.token).unwrap();
        assert_eq!(a.account_id, b.account_id);
        assert_eq!(a.username, "grace@example.com");
    }
}
