//! Typed state handed from one screen to the next.
//!
//! Replaces loose string keys in client-local storage. The serialized form
//! keeps the flat key names (`selected_org_id`, `auth_error`, ...) so a
//! persisted handoff stays readable, but every read and write goes through
//! the methods below. Diagnostics are one-shot: [`Handoff::take_auth_error`]
//! clears the message it returns.

use serde::{Deserialize, Serialize};

/// Tenant the user picked (or was assigned) on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSelection {
    pub org_id: String,
    pub org_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending_invite_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invite_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_error: Option<String>,
}

impl Handoff {
    /// Remembered tenant, if any. A selection without a name reads back with
    /// an empty name rather than being dropped.
    #[must_use]
    pub fn tenant(&self) -> Option<TenantSelection> {
        let org_id = self.selected_org_id.as_ref().filter(|id| !id.is_empty())?;
        Some(TenantSelection {
            org_id: org_id.clone(),
            org_name: self.selected_org_name.clone().unwrap_or_default(),
        })
    }

    pub fn remember_tenant(&mut self, org_id: impl Into<String>, org_name: impl Into<String>) {
        self.selected_org_id = Some(org_id.into());
        self.selected_org_name = Some(org_name.into());
    }

    pub fn forget_tenant(&mut self) {
        self.selected_org_id = None;
        self.selected_org_name = None;
    }

    pub fn set_auth_error(&mut self, message: impl Into<String>) {
        self.auth_error = Some(message.into());
    }

    /// Pending diagnostic without consuming it.
    #[must_use]
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Consume the pending diagnostic.
    pub fn take_auth_error(&mut self) -> Option<String> {
        self.auth_error.take()
    }

    pub fn set_invite_code(&mut self, code: impl Into<String>) {
        self.pending_invite_code = Some(code.into());
    }

    #[must_use]
    pub fn invite_code(&self) -> Option<&str> {
        self.pending_invite_code.as_deref()
    }

    pub fn set_invite_error(&mut self, message: impl Into<String>) {
        self.invite_error = Some(message.into());
    }

    #[must_use]
    pub fn invite_error(&self) -> Option<&str> {
        self.invite_error.as_deref()
    }

    /// Drop leftovers from the invite onboarding path.
    pub fn clear_invite(&mut self) {
        self.pending_invite_code = None;
        self.invite_error = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
