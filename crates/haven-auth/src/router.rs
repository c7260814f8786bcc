//! Post-authentication routing.
//!
//! Runs once right after a successful sign-in. It checks the tenant the user
//! picked on this device against the organization the backend actually
//! holds for the account, then sends the user to their landing route.
//!
//! Every failure ends in sign-out plus a redirect to the tenant picker, which
//! cannot lead back here without fresh credentials, so the procedure cannot
//! loop.

use std::sync::Arc;

use haven_core::{Handoff, Role, Route};
use serde::Serialize;

use crate::handoff_store::HandoffStore;
use crate::navigator::Navigator;
use crate::profile::ProfileReader;
use crate::session_store::SessionStore;

pub const UNPROVISIONED_MESSAGE: &str = "Your account is not linked to an organization yet. \
     Ask your organization's administrator to finish setting up your access.";

fn tenant_mismatch_message(selected_name: &str) -> String {
    if selected_name.is_empty() {
        "This account belongs to a different organization than the one you selected. \
         Select your organization and sign in again."
            .to_string()
    } else {
        format!(
            "This account does not belong to {selected_name}. \
             Select your organization and sign in again."
        )
    }
}

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Nobody is signed in.
    NoIdentity,
    /// Signed in, but the profile is missing or lacks organization or role.
    Unprovisioned,
    /// The remembered tenant is not the account's tenant.
    TenantMismatch { selected: String, actual: String },
    /// No tenant was remembered; the account's tenant was adopted.
    Adopted { org_id: String, org_name: String },
    /// The remembered tenant matched.
    Confirmed { org_id: String },
}

impl Outcome {
    #[must_use]
    pub const fn signed_out(&self) -> bool {
        matches!(self, Self::Unprovisioned | Self::TenantMismatch { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub destination: Route,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

pub struct PostAuthRouter {
    sessions: Arc<dyn SessionStore>,
    profiles: Arc<dyn ProfileReader>,
    handoff: Arc<dyn HandoffStore>,
    navigator: Arc<dyn Navigator>,
    fallback_org_name: String,
}

impl PostAuthRouter {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        profiles: Arc<dyn ProfileReader>,
        handoff: Arc<dyn HandoffStore>,
        navigator: Arc<dyn Navigator>,
        fallback_org_name: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            profiles,
            handoff,
            navigator,
            fallback_org_name: fallback_org_name.into(),
        }
    }

    /// Reconcile the device's tenant selection with the account and redirect.
    ///
    /// Never fails: unreadable handoff state is treated as "nothing
    /// remembered" (the server value then wins), and write failures are
    /// logged.
    pub async fn reconcile(&self) -> Reconciliation {
        let Some(identity) = self.sessions.get_user().await else {
            tracing::warn!("post-auth routing without a signed-in user");
            return self.finish(Route::Login, Outcome::NoIdentity, None);
        };

        let mut handoff = self.load_handoff();

        let profile = self.profiles.read_profile(&identity.user_id).await;
        let Some((org_id, role)) = profile
            .as_ref()
            .and_then(|p| p.provisioning())
            .map(|(org_id, role)| (org_id.to_string(), role))
        else {
            tracing::warn!(user_id = %identity.user_id, "account is not provisioned; signing out");
            handoff.set_auth_error(UNPROVISIONED_MESSAGE);
            self.save_handoff(&handoff);
            self.sessions.sign_out().await;
            return self.finish(Route::SelectOrganization, Outcome::Unprovisioned, None);
        };

        let outcome = match handoff.tenant() {
            Some(selected) if selected.org_id != org_id => {
                tracing::warn!(
                    selected = %selected.org_id,
                    actual = %org_id,
                    "signed in to a different organization than selected; signing out"
                );
                self.sessions.sign_out().await;
                handoff.forget_tenant();
                handoff.set_auth_error(tenant_mismatch_message(&selected.org_name));
                self.save_handoff(&handoff);
                return self.finish(
                    Route::SelectOrganization,
                    Outcome::TenantMismatch {
                        selected: selected.org_id,
                        actual: org_id,
                    },
                    Some(role),
                );
            }
            Some(_) => Outcome::Confirmed {
                org_id: org_id.clone(),
            },
            None => {
                let org_name = self.organization_name(&org_id).await;
                handoff.remember_tenant(org_id.clone(), org_name.clone());
                Outcome::Adopted {
                    org_id: org_id.clone(),
                    org_name,
                }
            }
        };

        handoff.clear_invite();
        self.save_handoff(&handoff);

        self.finish(Route::landing_for(role), outcome, Some(role))
    }

    async fn organization_name(&self, org_id: &str) -> String {
        match self.profiles.read_organization(org_id).await {
            Some(org) if !org.name.trim().is_empty() => org.name,
            _ => {
                tracing::warn!(
                    %org_id,
                    fallback = %self.fallback_org_name,
                    "organization name unavailable"
                );
                self.fallback_org_name.clone()
            }
        }
    }

    fn load_handoff(&self) -> Handoff {
        self.handoff.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "handoff state unreadable; starting fresh");
            Handoff::default()
        })
    }

    fn save_handoff(&self, handoff: &Handoff) {
        if let Err(error) = self.handoff.save(handoff) {
            tracing::warn!(%error, "failed to persist handoff state");
        }
    }

    fn finish(&self, destination: Route, outcome: Outcome, role: Option<Role>) -> Reconciliation {
        tracing::debug!(%destination, ?outcome, "post-auth routing done");
        self.navigator.redirect(destination);
        Reconciliation {
            destination,
            outcome,
            role,
        }
    }
}
