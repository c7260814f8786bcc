//! What the admin handlers need from the hosted backend.

use async_trait::async_trait;
use haven_auth::{AuthError, BackendClient};
use haven_core::{Identity, Profile};

#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// Account behind a caller's access token.
    async fn caller(&self, access_token: &str) -> Result<Identity, AuthError>;

    /// Profile row, read with the service credential.
    async fn profile(&self, user_id: &str) -> Result<Option<Profile>, AuthError>;

    async fn create_user(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn save_profile(&self, profile: &Profile) -> Result<(), AuthError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), AuthError>;

    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), AuthError>;
}

/// Must be built with [`BackendClient::with_service_role`].
#[async_trait]
impl AdminBackend for BackendClient {
    async fn caller(&self, access_token: &str) -> Result<Identity, AuthError> {
        self.get_user(access_token).await
    }

    async fn profile(&self, user_id: &str) -> Result<Option<Profile>, AuthError> {
        self.admin_fetch_profile(user_id).await
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.admin_create_user(email, password).await
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AuthError> {
        self.insert_profile(profile).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), AuthError> {
        self.admin_delete_user(user_id).await
    }

    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), AuthError> {
        self.admin_update_password(user_id, password).await
    }
}
