//! The session store: who is signed in, and change notifications.
//!
//! [`SessionStore`] is the seam the guards and the post-authentication router
//! depend on. [`RemoteSessionStore`] implements it against the hosted
//! backend and persists the session through [`TokenStore`].

use async_trait::async_trait;
use haven_core::{Identity, Session};
use tokio::sync::watch;

use crate::AuthError;
use crate::backend::BackendClient;
use crate::token_store::TokenStore;

/// Sessions expiring within this window are refreshed before use.
const EXPIRY_BUFFER_SECS: i64 = 60;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, if any. Never fails: errors collapse to `None`.
    async fn get_session(&self) -> Option<Session>;

    /// Identity behind the current session, verified with the backend.
    async fn get_user(&self) -> Option<Identity>;

    /// Exchange credentials for a session and publish it.
    async fn sign_in_with_password(&self, email: &str, password: &str)
    -> Result<Session, AuthError>;

    /// Drop the current session and publish the change. Failures are logged.
    async fn sign_out(&self);

    /// Subscribe to session changes. Dropping the handle unsubscribes.
    fn subscribe(&self) -> SessionEvents;
}

/// Subscription handle for session changes.
///
/// Only changes published after `subscribe` are delivered; intermediate
/// values may be skipped, the latest one always wins.
#[derive(Debug)]
pub struct SessionEvents {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionEvents {
    #[must_use]
    pub const fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx }
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the store is gone; the outer `Option` is the
    /// subscription, the inner one is the session.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

pub struct RemoteSessionStore {
    client: BackendClient,
    tokens: TokenStore,
    tx: watch::Sender<Option<Session>>,
}

impl RemoteSessionStore {
    /// Build a store, restoring any persisted session.
    #[must_use]
    pub fn new(client: BackendClient, tokens: TokenStore) -> Self {
        let restored = tokens.load();
        let (tx, _rx) = watch::channel(restored);
        Self { client, tokens, tx }
    }

    fn publish(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    fn clear_persisted(&self) {
        if let Err(error) = self.tokens.delete() {
            tracing::warn!(%error, "failed to clear persisted session");
        }
    }

    async fn refresh(&self, stale: &Session) -> Option<Session> {
        let refresh_token = stale.refresh_token.as_deref()?;
        match self.client.refresh_session(refresh_token).await {
            Ok(session) => {
                if let Err(error) = self.tokens.store(&session) {
                    tracing::warn!(%error, "failed to persist refreshed session");
                }
                tracing::debug!(user_id = %session.identity.user_id, "session refreshed");
                Some(session)
            }
            Err(error) => {
                tracing::warn!(%error, "session refresh failed");
                None
            }
        }
    }
}

#[async_trait]
impl SessionStore for RemoteSessionStore {
    async fn get_session(&self) -> Option<Session> {
        let current = self.tx.borrow().clone()?;
        if !current.is_near_expiry(EXPIRY_BUFFER_SECS) {
            return Some(current);
        }

        if let Some(refreshed) = self.refresh(&current).await {
            self.publish(Some(refreshed.clone()));
            return Some(refreshed);
        }

        tracing::debug!(expires_at = %current.expires_at, "stored session expired");
        self.clear_persisted();
        self.publish(None);
        None
    }

    async fn get_user(&self) -> Option<Identity> {
        let session = self.get_session().await?;
        match self.client.get_user(&session.access_token).await {
            Ok(identity) => Some(identity),
            Err(error) => {
                tracing::warn!(%error, "could not resolve current user");
                None
            }
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let session = self.client.sign_in_with_password(email, password).await?;
        self.tokens.store(&session)?;
        tracing::info!(user_id = %session.identity.user_id, "signed in");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) {
        let current = self.tx.borrow().clone();
        if let Some(session) = current {
            if let Err(error) = self.client.sign_out(&session.access_token).await {
                tracing::warn!(%error, "backend sign out failed; clearing local session anyway");
            }
            tracing::info!(user_id = %session.identity.user_id, "signed out");
        }
        self.clear_persisted();
        self.publish(None);
    }

    fn subscribe(&self) -> SessionEvents {
        SessionEvents::new(self.tx.subscribe())
    }
}
