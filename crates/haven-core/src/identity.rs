use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lightweight authenticated user identity for cross-crate passing.
///
/// Produced by the session store in `haven-auth`, consumed by the guards,
/// the post-authentication router and the admin API. Contains only data
/// fields; no backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend user ID (the `sub` of the access token).
    pub user_id: String,
    /// Email the account signed in with, if the backend returned it.
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session as handed out by the backend's auth service.
///
/// Owned by the session store for its lifetime; everything else only
/// observes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for backend requests.
    pub access_token: String,
    /// Refresh token, when the backend issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token expiration time.
    pub expires_at: DateTime<Utc>,
    /// The account this session belongs to.
    pub identity: Identity,
}

impl Session {
    /// Check if the session is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }
}
