//! Paths for the logical routes the guards and router redirect to.

use haven_core::Route;
use serde::{Deserialize, Serialize};

fn default_login() -> String {
    "/login".into()
}

fn default_select_organization() -> String {
    "/select-organization".into()
}

fn default_admin() -> String {
    "/admin".into()
}

fn default_volunteer() -> String {
    "/volunteer".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    #[serde(default = "default_login")]
    pub login: String,

    #[serde(default = "default_select_organization")]
    pub select_organization: String,

    #[serde(default = "default_admin")]
    pub admin: String,

    #[serde(default = "default_volunteer")]
    pub volunteer: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            select_organization: default_select_organization(),
            admin: default_admin(),
            volunteer: default_volunteer(),
        }
    }
}

impl RoutesConfig {
    #[must_use]
    pub fn path(&self, route: Route) -> &str {
        match route {
            Route::Login => &self.login,
            Route::SelectOrganization => &self.select_organization,
            Route::AdminLanding => &self.admin,
            Route::VolunteerLanding => &self.volunteer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.path(Route::Login), "/login");
        assert_eq!(routes.path(Route::SelectOrganization), "/select-organization");
        assert_eq!(routes.path(Route::AdminLanding), "/admin");
        assert_eq!(routes.path(Route::VolunteerLanding), "/volunteer");
    }
}
