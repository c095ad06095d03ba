//! Authentication models

use serde::{Deserialize, Serialize};

/// Credential bundle passed to `login`.
///
/// Immutable value constructed by the caller. The optional client id
/// scopes the session to one tenant when the account can access several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationModel {
    /// Account username
    pub username: String,

    /// Account password
    pub password: String,

    /// Optional tenant (client) id to authenticate against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl AuthenticationModel {
    /// Create credentials without a tenant scope.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: None,
        }
    }

    /// Create credentials scoped to a specific tenant.
    pub fn with_client_id(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: Some(client_id.into()),
        }
    }
}

/// Opaque authorization token issued by `login`.
///
/// Required by every other operation. No expiry is tracked at this layer;
/// callers re-authenticate when the service rejects the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, as sent in the Authorization header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the service returned an empty token value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Tokens are credentials; never print the full value
        let shown = self.0.chars().take(8).collect::<String>();
        write!(f, "{}…", shown)
    }
}
