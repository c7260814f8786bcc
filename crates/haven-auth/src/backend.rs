//! REST client for the hosted backend.
//!
//! Talks to the auth service (`/auth/v1/*`) and the table API
//! (`/rest/v1/*`) directly via `reqwest`. Every request carries the
//! project's `apikey` header; table reads additionally carry the caller's
//! bearer token so row-level security applies to them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use haven_config::BackendConfig;
use haven_core::{Identity, Organization, Profile, Session};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::AuthError;

const PROFILE_COLUMNS: &str = "id,organization_id,full_name,role";
const ORGANIZATION_COLUMNS: &str = "id,name";
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserRecord> for Identity {
    fn from(user: UserRecord) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
        }
    }
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| {
                expiry_after(now, self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS))
            });

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            identity: self.user.into(),
        }
    }
}

/// `now + secs`, using the default lifetime when `secs` is out of range.
fn expiry_after(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    let after = |secs| {
        chrono::TimeDelta::try_seconds(secs).and_then(|delta| now.checked_add_signed(delta))
    };
    after(secs)
        .or_else(|| after(DEFAULT_EXPIRES_IN_SECS))
        .unwrap_or(now)
}

/// Error payloads differ between the auth service and the table API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self, fallback: &str) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl BackendClient {
    /// Client authenticated with the public anon key.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Other` if the backend section is not configured,
    /// or `AuthError::Backend` if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, AuthError> {
        config
            .require()
            .map_err(|error| AuthError::Other(error.to_string()))?;
        Self::build(config, &config.anon_key)
    }

    /// Client authenticated with the elevated service credential.
    ///
    /// Only the admin API may hold one of these.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Other` if `service_role_key` is missing.
    pub fn with_service_role(config: &BackendConfig) -> Result<Self, AuthError> {
        if !config.can_administer() {
            return Err(AuthError::Other(
                "backend.service_role_key is not configured".into(),
            ));
        }
        Self::build(config, &config.service_role_key)
    }

    fn build(config: &BackendConfig, api_key: &str) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AuthError::Backend(format!("build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            api_key: api_key.to_string(),
        })
    }

    // --- Auth service ---

    /// Exchange email + password for a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the auth service rejects
    /// the credentials, `AuthError::Backend` on transport or server failure.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("sign in: {e}")))?;

        if resp.status().is_client_error() {
            let body = resp.json::<ErrorBody>().await.unwrap_or_default();
            return Err(AuthError::InvalidCredentials(
                body.into_message("sign in rejected"),
            ));
        }

        let token: TokenResponse = parse(resp, "sign in").await?;
        Ok(token.into_session(Utc::now()))
    }

    /// Trade a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` if the refresh token is no longer
    /// accepted, `AuthError::Backend` on transport or server failure.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("refresh session: {e}")))?;

        if resp.status().is_client_error() {
            return Err(AuthError::SessionExpired);
        }

        let token: TokenResponse = parse(resp, "refresh session").await?;
        Ok(token.into_session(Utc::now()))
    }

    /// Resolve the account behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if the token is rejected.
    pub async fn get_user(&self, access_token: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("get user: {e}")))?;

        if matches!(resp.status().as_u16(), 401 | 403) {
            return Err(AuthError::NotAuthenticated);
        }

        let user: UserRecord = parse(resp, "get user").await?;
        Ok(user.into())
    }

    /// Revoke the session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Backend` on transport or server failure.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("sign out: {e}")))?;
        expect_success(resp, "sign out").await
    }

    // --- Table API ---

    /// Read one profile row by identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on transport, status, or parse failure. A missing
    /// row is `Ok(None)`.
    pub async fn fetch_profile(
        &self,
        bearer: &str,
        user_id: &str,
    ) -> Result<Option<Profile>, AuthError> {
        self.select_first("profiles", "id", user_id, PROFILE_COLUMNS, bearer)
            .await
    }

    /// Read one organization row by ID.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_profile`].
    pub async fn fetch_organization(
        &self,
        bearer: &str,
        org_id: &str,
    ) -> Result<Option<Organization>, AuthError> {
        self.select_first("organizations", "id", org_id, ORGANIZATION_COLUMNS, bearer)
            .await
    }

    async fn select_first<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        columns: &str,
        bearer: &str,
    ) -> Result<Option<T>, AuthError> {
        let url = select_url(&self.base_url, table, column, value, columns);
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("read {table}: {e}")))?;

        let rows: Vec<T> = parse(resp, table).await?;
        Ok(rows.into_iter().next())
    }

    // --- Admin (service credential only) ---

    /// Create a confirmed account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` if the auth service refuses the account
    /// (e.g., email already registered).
    pub async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let url = format!("{}/auth/v1/admin/users", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("create user: {e}")))?;

        let user: UserRecord = parse(resp, "create user").await?;
        Ok(user.into())
    }

    /// Set a new password for an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` if the auth service refuses the update.
    pub async fn admin_update_password(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let url = format!(
            "{}/auth/v1/admin/users/{}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        let resp = self
            .http
            .put(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("update password: {e}")))?;
        expect_success(resp, "update password").await
    }

    /// Delete an account. Used to roll back a half-created member.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on transport or status failure.
    pub async fn admin_delete_user(&self, user_id: &str) -> Result<(), AuthError> {
        let url = format!(
            "{}/auth/v1/admin/users/{}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        let resp = self
            .http
            .delete(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("delete user: {e}")))?;
        expect_success(resp, "delete user").await
    }

    /// Insert a profile row with the service credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` on constraint violations.
    pub async fn insert_profile(&self, profile: &Profile) -> Result<(), AuthError> {
        let url = format!("{}/rest/v1/profiles", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(&self.api_key)
            .json(profile)
            .send()
            .await
            .map_err(|e| AuthError::Backend(format!("insert profile: {e}")))?;
        expect_success(resp, "insert profile").await
    }

    /// Read a profile bypassing row-level security.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_profile`].
    pub async fn admin_fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, AuthError> {
        self.fetch_profile(&self.api_key, user_id).await
    }
}

fn select_url(base_url: &str, table: &str, column: &str, value: &str, columns: &str) -> String {
    format!(
        "{base_url}/rest/v1/{table}?{column}=eq.{}&select={columns}&limit=1",
        urlencoding::encode(value)
    )
}

async fn status_error(resp: reqwest::Response, what: &str) -> AuthError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if status.is_client_error() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.into_message(&body))
            .unwrap_or(body);
        AuthError::Rejected(format!("{what}: {message}"))
    } else {
        AuthError::Backend(format!("{what}: HTTP {status}: {body}"))
    }
}

async fn parse<T: DeserializeOwned>(resp: reqwest::Response, what: &str) -> Result<T, AuthError> {
    if !resp.status().is_success() {
        return Err(status_error(resp, what).await);
    }
    resp.json()
        .await
        .map_err(|e| AuthError::Backend(format!("parse {what}: {e}")))
}

async fn expect_success(resp: reqwest::Response, what: &str) -> Result<(), AuthError> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(status_error(resp, what).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(expires_in: Option<i64>, expires_at: Option<i64>) -> TokenResponse {
        TokenResponse {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_in,
            expires_at,
            user: UserRecord {
                id: "user-1".into(),
                email: Some("a@shelter.org".into()),
            },
        }
    }

    #[test]
    fn session_prefers_absolute_expiry() {
        let now = Utc::now();
        let at = now.timestamp() + 120;
        let session = token(Some(3600), Some(at)).into_session(now);
        assert_eq!(session.expires_at.timestamp(), at);
        assert_eq!(session.identity.user_id, "user-1");
    }

    #[test]
    fn session_falls_back_to_relative_expiry() {
        let now = Utc::now();
        let session = token(Some(600), None).into_session(now);
        assert_eq!(session.expires_at, now + chrono::TimeDelta::seconds(600));

        let session = token(None, None).into_session(now);
        assert_eq!(
            session.expires_at,
            now + chrono::TimeDelta::seconds(DEFAULT_EXPIRES_IN_SECS)
        );
    }

    #[test]
    fn out_of_range_lifetime_uses_default() {
        let now = Utc::now();
        let default = now + chrono::TimeDelta::seconds(DEFAULT_EXPIRES_IN_SECS);

        let session = token(Some(i64::MAX), None).into_session(now);
        assert_eq!(session.expires_at, default);

        let session = token(Some(i64::MIN), None).into_session(now);
        assert_eq!(session.expires_at, default);
    }

    #[test]
    fn token_response_parses_auth_service_payload() {
        let parsed: TokenResponse = serde_json::from_str(
            r#"{
                "access_token": "eyJ.a.b",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "r-1",
                "user": {"id": "u-1", "email": "v@shelter.org", "role": "authenticated"}
            }"#,
        )
        .expect("should parse");
        assert_eq!(parsed.access_token, "eyJ.a.b");
        assert_eq!(parsed.user.email.as_deref(), Some("v@shelter.org"));
    }

    #[test]
    fn error_body_prefers_description() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .expect("parse");
        assert_eq!(body.into_message("x"), "Invalid login credentials");
    }

    #[test]
    fn error_body_falls_back() {
        assert_eq!(ErrorBody::default().into_message("sign in rejected"), "sign in rejected");
    }

    #[test]
    fn select_url_encodes_filter_value() {
        let url = select_url(
            "https://abcd.supabase.co",
            "profiles",
            "id",
            "a b&c",
            PROFILE_COLUMNS,
        );
        assert_eq!(
            url,
            "https://abcd.supabase.co/rest/v1/profiles?id=eq.a%20b%26c&select=id,organization_id,full_name,role&limit=1"
        );
    }

    #[test]
    fn service_client_requires_service_key() {
        let config = BackendConfig {
            url: "https://abcd.supabase.co".into(),
            anon_key: "anon".into(),
            ..Default::default()
        };
        assert!(BackendClient::new(&config).is_ok());
        let err = BackendClient::with_service_role(&config).unwrap_err();
        assert!(err.to_string().contains("service_role_key"));
    }

    #[test]
    fn unconfigured_backend_is_rejected() {
        let err = BackendClient::new(&BackendConfig::default()).unwrap_err();
        assert!(err.to_string().contains("backend"));
    }
}
