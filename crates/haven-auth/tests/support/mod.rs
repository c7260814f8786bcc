//! In-memory collaborators for guard and router tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use haven_auth::{AuthError, ProfileReader, SessionEvents, SessionStore};
use haven_core::{Identity, Organization, Profile, Role, Session};
use tokio::sync::{Notify, watch};

pub fn session(user_id: &str) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        refresh_token: None,
        expires_at: Utc::now() + chrono::TimeDelta::hours(1),
        identity: Identity {
            user_id: user_id.into(),
            email: Some(format!("{user_id}@shelter.org")),
        },
    }
}

pub fn profile(user_id: &str, org_id: Option<&str>, role: Option<Role>) -> Profile {
    Profile {
        id: user_id.into(),
        organization_id: org_id.map(String::from),
        full_name: None,
        role,
    }
}

pub struct FakeSessionStore {
    tx: watch::Sender<Option<Session>>,
    hold: Option<Arc<Notify>>,
    get_session_calls: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl FakeSessionStore {
    pub fn signed_in(user_id: &str) -> Self {
        Self::with(Some(session(user_id)))
    }

    pub fn signed_out() -> Self {
        Self::with(None)
    }

    fn with(current: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(current);
        Self {
            tx,
            hold: None,
            get_session_calls: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }

    /// Make `get_session` wait until `gate` is notified.
    pub fn held(mut self, gate: Arc<Notify>) -> Self {
        self.hold = Some(gate);
        self
    }

    /// Publish a session change, as the backend client would.
    pub fn set(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn subscribers(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn get_session_calls(&self) -> usize {
        self.get_session_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for FakeSessionStore {
    async fn get_session(&self) -> Option<Session> {
        self.get_session_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.hold {
            gate.notified().await;
        }
        self.current()
    }

    async fn get_user(&self) -> Option<Identity> {
        self.current().map(|session| session.identity)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<Session, AuthError> {
        let user_id = email.split('@').next().unwrap_or(email);
        let session = session(user_id);
        self.set(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.set(None);
    }

    fn subscribe(&self) -> SessionEvents {
        SessionEvents::new(self.tx.subscribe())
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    profiles: HashMap<String, Profile>,
    organizations: HashMap<String, Organization>,
    hold: Option<Arc<Notify>>,
    profile_reads: AtomicUsize,
}

impl FakeProfiles {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.id.clone(), profile);
        self
    }

    pub fn with_organization(mut self, id: &str, name: &str) -> Self {
        self.organizations.insert(
            id.into(),
            Organization {
                id: id.into(),
                name: name.into(),
            },
        );
        self
    }

    pub fn held(mut self, gate: Arc<Notify>) -> Self {
        self.hold = Some(gate);
        self
    }

    pub fn profile_reads(&self) -> usize {
        self.profile_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileReader for FakeProfiles {
    async fn read_profile(&self, user_id: &str) -> Option<Profile> {
        self.profile_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.hold {
            gate.notified().await;
        }
        self.profiles.get(user_id).cloned()
    }

    async fn read_organization(&self, org_id: &str) -> Option<Organization> {
        self.organizations.get(org_id).cloned()
    }
}

/// Counts how many times a render closure ran.
#[derive(Default)]
pub struct RenderCount(AtomicUsize);

impl RenderCount {
    pub fn hit(&self) -> &'static str {
        self.0.fetch_add(1, Ordering::SeqCst);
        "protected"
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Let spawned guard tasks run.
pub async fn settle_tasks() {
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}
