use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Authorization record for one identity: organization membership and role.
///
/// Created out-of-band by onboarding; read-only from the client. Both
/// `organization_id` and `role` are optional because rows can be partially
/// provisioned, and the post-authentication router has to detect that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same value as the identity's user ID.
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Profile {
    /// `true` only for a profile that explicitly carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(Role::is_admin)
    }

    /// Organization and role, if both are present. A blank organization
    /// id counts as missing.
    #[must_use]
    pub fn provisioning(&self) -> Option<(&str, Role)> {
        let org_id = self.organization_id.as_deref().filter(|id| !id.is_empty())?;
        Some((org_id, self.role?))
    }
}

/// A tenant (shelter / organization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_backend_row() {
        let profile: Profile = serde_json::from_str(
            r#"{"id":"u1","organization_id":"org-1","full_name":null,"role":"admin"}"#,
        )
        .expect("should deserialize");

        assert_eq!(
            profile,
            Profile {
                id: "u1".into(),
                organization_id: Some("org-1".into()),
                full_name: None,
                role: Some(Role::Admin),
            }
        );
        assert!(profile.is_admin());
    }

    #[test]
    fn provisioning_requires_both_fields() {
        let mut profile = Profile {
            id: "u1".into(),
            organization_id: Some("org-1".into()),
            full_name: None,
            role: None,
        };
        assert!(profile.provisioning().is_none());

        profile.role = Some(Role::Volunteer);
        assert_eq!(profile.provisioning(), Some(("org-1", Role::Volunteer)));

        profile.organization_id = Some(String::new());
        assert!(profile.provisioning().is_none());

        profile.organization_id = None;
        assert!(profile.provisioning().is_none());
    }

    #[test]
    fn missing_role_is_not_admin() {
        let profile: Profile =
            serde_json::from_str(r#"{"id":"u2","organization_id":"org-1"}"#).expect("deserialize");
        assert!(!profile.is_admin());
    }
}
