//! Profile reads.
//!
//! A pure read of the caller's authorization record. No caching, no retry.
//! "No row" and "query failed" both come back as `None`; the failure is
//! logged with its cause so the two stay distinguishable in logs.

use std::sync::Arc;

use async_trait::async_trait;
use haven_core::{Organization, Profile};

use crate::backend::BackendClient;
use crate::session_store::SessionStore;

#[async_trait]
pub trait ProfileReader: Send + Sync {
    /// Profile for an identity, or `None` on no-row or query error.
    async fn read_profile(&self, user_id: &str) -> Option<Profile>;

    /// Organization by ID, or `None` on no-row or query error.
    async fn read_organization(&self, org_id: &str) -> Option<Organization>;
}

/// Profile of whoever is signed in right now.
pub async fn current_profile(
    sessions: &dyn SessionStore,
    profiles: &dyn ProfileReader,
) -> Option<Profile> {
    let identity = sessions.get_user().await?;
    profiles.read_profile(&identity.user_id).await
}

/// Reads rows as the signed-in user, so row-level security applies.
pub struct RemoteProfileReader {
    client: BackendClient,
    sessions: Arc<dyn SessionStore>,
}

impl RemoteProfileReader {
    #[must_use]
    pub fn new(client: BackendClient, sessions: Arc<dyn SessionStore>) -> Self {
        Self { client, sessions }
    }

    async fn bearer(&self) -> Option<String> {
        self.sessions
            .get_session()
            .await
            .map(|session| session.access_token)
    }
}

#[async_trait]
impl ProfileReader for RemoteProfileReader {
    async fn read_profile(&self, user_id: &str) -> Option<Profile> {
        let bearer = self.bearer().await?;
        match self.client.fetch_profile(&bearer, user_id).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                tracing::warn!(%user_id, "no profile row for user");
                None
            }
            Err(error) => {
                tracing::warn!(%user_id, %error, "profile read failed");
                None
            }
        }
    }

    async fn read_organization(&self, org_id: &str) -> Option<Organization> {
        let bearer = self.bearer().await?;
        match self.client.fetch_organization(&bearer, org_id).await {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(%org_id, %error, "organization read failed");
                None
            }
        }
    }
}
