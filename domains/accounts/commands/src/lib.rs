use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/auth/register`. Fields are optional so that an
/// incomplete body is reported as missing credentials.
#[derive(Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterCommand {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginCommand {
    pub username: Option<String>,
    pub password: Option<String>,
}

macro_rules! redacted_debug {
    ($command:ty) => {
        impl fmt::Debug for $command {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($command))
                    .field("username", &self.username)
                    .field("password", &self.password.as_ref().map(|_| "***"))
                    .finish()
            }
        }
    };
}

redacted_debug!(RegisterCommand);
redacted_debug!(LoginCommand);

/// Non-blank `(username, password)` pair, if both are present.
fn credentials<'a>(
    username: &'a Option<String>, password: &'a Option<String>,
) -> Option<(&'a str, &'a str)> {
    let username = username.as_deref().map(str::trim)?;
    let password = password.as_deref()?;
    (!username.is_empty() && !password.is_empty())
        .then_some((username, password))
}

impl RegisterCommand {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        credentials(&self.username, &self.password)
    }
}

impl LoginCommand {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        credentials(&self.username, &self.password)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisteredResponse {
    pub message: String,
}

impl RegisteredResponse {
    pub fn registered() -> Self {
        Self {
            message: "User registered".to_string(),
        }
    }
}
