//! General application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_fallback_org_name() -> String {
    "Your Organization".into()
}

/// Default low-stock threshold for inventory reports.
const fn default_low_stock_threshold() -> i64 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory for persisted client state (session, handoff).
    /// Empty means `~/.haven`.
    #[serde(default)]
    pub state_dir: String,

    /// Display name used when the organization name lookup fails.
    #[serde(default = "default_fallback_org_name")]
    pub fallback_org_name: String,

    /// Items at or below this stock level are reported as low.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            state_dir: String::new(),
            fallback_org_name: default_fallback_org_name(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

impl GeneralConfig {
    /// Resolve the state directory, defaulting to `~/.haven`.
    #[must_use]
    pub fn state_dir(&self) -> Option<PathBuf> {
        if self.state_dir.is_empty() {
            dirs::home_dir().map(|home| home.join(".haven"))
        } else {
            Some(PathBuf::from(&self.state_dir))
        }
    }
}
