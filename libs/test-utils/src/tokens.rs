use account_models::Identity;
use secrecy::SecretString;
use session_tokens::TokenIssuer;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test_secret_key_minimum_32_chars!";

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(&SecretString::from(TEST_JWT_SECRET), 60)
}

pub fn identity(username: &str) -> Identity {
    Identity {
        account_id: Uuid::now_v7(),
        username: username.to_string(),
    }
}

/// `Authorization` header value for a freshly issued token.
pub fn bearer(issuer: &TokenIssuer, username: &str) -> String {
    match issuer.issue(&identity(username)) {
        Ok(token) => format!("Bearer {token}"),
        Err(err) => panic!("test token could not be issued: {err}"),
    }
}
