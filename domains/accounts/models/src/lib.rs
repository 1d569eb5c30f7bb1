use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A login identity, separate from the `users` resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    /// Absent for accounts created through an external provider.
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
}

/// Profile returned by an external identity provider after a code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalProfile {
    pub provider_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl ExternalProfile {
    /// The username an account created from this profile receives.
    pub fn username(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.trim().is_empty())
    }
}

/// Authenticated caller, as decoded from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    pub account_id: Uuid,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_username_requires_email() {
        let mut profile = ExternalProfile {
            provider_id: "1187".to_string(),
            email: Some("ann@example.com".to_string()),
            display_name: None,
        };
        assert_eq!(profile.username(), Some("ann@example.com"));

        profile.email = Some("  ".to_string());
        assert_eq!(profile.username(), None);

        profile.email = None;
        assert_eq!(profile.username(), None);
    }
}
