use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Credential metadata. The secret payload is never part of this type; it is
/// fetched on demand through the credential store and discarded after use.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Credential {
    pub id: Uuid,

    pub name: String,

    pub auth_kind: AuthKind,

    /// Header the token is placed in. Defaults to `Authorization`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,

    /// Prefix before the token, e.g. `Bearer` or `Token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_prefix: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Credential {
    /// Expiry check against a caller-supplied clock. No `expires_at` means
    /// the credential never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(t) => now > t,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    Bearer,
    Basic,
    /// Legacy tag; behaves exactly like `ApiKeyHeader`.
    ApiKey,
    ApiKeyHeader,
    ApiKeyQuery,
    Oauth2,
    Custom,
    None,
}
