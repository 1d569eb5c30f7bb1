use std::sync::Arc;

use account_errors::AuthError;
use account_models::{ExternalProfile, Identity};
use database_traits::{AccountStore, StoreError};
use session_tokens::{TokenIssuer, password};
use tracing::instrument;

/// Every way a caller can prove who they are.
#[derive(Debug)]
pub enum Credential<'a> {
    Password { username: &'a str, password: &'a str },
    External(&'a ExternalProfile),
    Bearer(&'a str),
}

#[derive(Clone)]
pub struct Authenticator {
    accounts: Arc<dyn AccountStore>,
    tokens: TokenIssuer,
}

impl Authenticator {
    pub fn new(accounts: Arc<dyn AccountStore>, tokens: TokenIssuer) -> Self {
        Self { accounts, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer { &self.tokens }

    pub(crate) fn accounts(&self) -> &Arc<dyn AccountStore> { &self.accounts }

    #[instrument(skip_all)]
    pub async fn verify(
        &self, credential: Credential<'_>,
    ) -> Result<Identity, AuthError> {
        match credential {
            Credential::Password { username, password } => {
                self.verify_password(username, password).await
            }
            Credential::External(profile) => {
                self.verify_external(profile).await
            }
            Credential::Bearer(token) => {
                self.tokens.verify(token).map_err(|_| AuthError::Forbidden)
            }
        }
    }

    /// Verifies the credential and signs a session token for it.
    pub async fn sign_in(
        &self, credential: Credential<'_>,
    ) -> Result<String, AuthError> {
        let identity = self.verify(credential).await?;
        self.tokens
            .issue(&identity)
            .map_err(|err| AuthError::Internal(err.to_string()))
    }

    async fn verify_password(
        &self, username: &str, candidate: &str,
    ) -> Result<Identity, AuthError> {
        let account = self
            .accounts
            .find_by_username(username)
            .await
            .map_err(storage_error)?
            .ok_or(AuthError::UnknownUser)?;

        // Accounts created through a provider have no password to compare.
        let Some(hash) = account.password_hash.clone() else {
            return Err(AuthError::InvalidCredentials);
        };

        let candidate = candidate.to_string();
        let matches = tokio::task::spawn_blocking(move || {
            password::verify(&candidate, &hash)
        })
        .await
        .map_err(|err| AuthError::Internal(err.to_string()))?;

        if matches {
            Ok(account.identity())
        }
        else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn verify_external(
        &self, profile: &ExternalProfile,
    ) -> Result<Identity, AuthError> {
        if profile.provider_id.trim().is_empty() {
            return Err(AuthError::OAuthFailed(
                "profile has no id".to_string(),
            ));
        }
        let username = profile.username().ok_or_else(|| {
            AuthError::OAuthFailed("profile has no email".to_string())
        })?;

        let account = self
            .accounts
            .upsert_external(&profile.provider_id, username)
            .await
            .map_err(|err| {
                match err {
                    StoreError::Duplicate { constraint } => {
                        AuthError::OAuthFailed(format!(
                            "account conflict on {constraint}"
                        ))
                    }
                    other => storage_error(other),
                }
            })?;

        tracing::info!("External login for account: {}", account.id);
        Ok(account.identity())
    }
}

pub(crate) fn storage_error(err: StoreError) -> AuthError {
    match err {
        StoreError::Unavailable(msg) => AuthError::Unavailable(msg),
        other => AuthError::Internal(other.to_string()),
    }
}
