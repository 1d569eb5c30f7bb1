use std::sync::Arc;

use account_models::Identity;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

const STATE_SUBJECT: &str = "oauth-state";
const STATE_TTL_MINUTES: i64 = 10;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateClaims {
    sub: String,
    nonce: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT encoding failed: {0}")]
    Encoding(String),
    #[error("invalid or expired token")]
    Invalid,
    #[error("invalid claim: {0}")]
    InvalidClaim(&'static str),
}

/// Issues and verifies HS256 tokens with keys derived once from the secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SecretString, ttl_minutes: u64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims =
            ["exp", "sub"].iter().map(|c| c.to_string()).collect();

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret_bytes)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret_bytes)),
            validation,
            ttl: Duration::minutes(i64::try_from(ttl_minutes).unwrap_or(60)),
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.account_id.to_string(),
            username: identity.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims: Claims = self.decode(token)?;

        Ok(Identity {
            account_id: Uuid::parse_str(&claims.sub)
                .map_err(|_| TokenError::InvalidClaim("sub"))?,
            username: claims.username,
        })
    }

    /// Short-lived token carried through the OAuth redirect as `state`.
    pub fn issue_state(&self) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = StateClaims {
            sub: STATE_SUBJECT.to_string(),
            nonce: Uuid::now_v7().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(STATE_TTL_MINUTES)).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn verify_state(&self, state: &str) -> Result<(), TokenError> {
        let claims: StateClaims = self.decode(state)?;
        if claims.sub != STATE_SUBJECT {
            return Err(TokenError::InvalidClaim("sub"));
        }
        Ok(())
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
