use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::Role;

/// Logical destinations the client can be redirected to.
///
/// Concrete paths are configuration (`haven-config`'s `RoutesConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Entry point: credential form.
    Login,
    /// Tenant picker shown before login and after any fatal sign-in error.
    SelectOrganization,
    AdminLanding,
    VolunteerLanding,
}

impl Route {
    /// Where authenticated-but-not-allowed users are sent.
    pub const DEFAULT_LANDING: Self = Self::VolunteerLanding;

    /// Landing route for a role. Anything but `admin` lands on the volunteer side.
    #[must_use]
    pub const fn landing_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminLanding,
            Role::Volunteer | Role::Unknown => Self::VolunteerLanding,
        }
    }

    #[must_use]
    pub const fn is_landing(self) -> bool {
        matches!(self, Self::AdminLanding | Self::VolunteerLanding)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SelectOrganization => "select_organization",
            Self::AdminLanding => "admin_landing",
            Self::VolunteerLanding => "volunteer_landing",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_lands_on_admin() {
        assert_eq!(Route::landing_for(Role::Admin), Route::AdminLanding);
        assert_eq!(Route::landing_for(Role::Volunteer), Route::VolunteerLanding);
        assert_eq!(Route::landing_for(Role::Unknown), Route::VolunteerLanding);
    }

    #[test]
    fn default_landing_is_not_the_entry_route() {
        assert_ne!(Route::DEFAULT_LANDING, Route::Login);
        assert!(Route::DEFAULT_LANDING.is_landing());
    }
}
