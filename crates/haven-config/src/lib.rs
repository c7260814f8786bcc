//! # haven-config
//!
//! Layered configuration loading for Haven using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HAVEN_*` prefix, `__` as separator)
//! 2. Project-level `.haven/config.toml`
//! 3. User-level `~/.config/haven/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HAVEN_BACKEND__URL` -> `backend.url`,
//! `HAVEN_ROUTES__ADMIN` -> `routes.admin`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use haven_config::HavenConfig;
//!
//! let config = HavenConfig::load_with_dotenv().expect("config");
//!
//! if config.backend.is_configured() {
//!     println!("Backend: {}", config.backend.base_url());
//! }
//! ```

mod admin;
mod backend;
mod error;
mod general;
mod routes;

pub use admin::AdminConfig;
pub use backend::BackendConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use routes::RoutesConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HavenConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl HavenConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Load configuration with an explicit TOML file layered above the
    /// discovered ones (and still below the environment).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the file does not exist, or
    /// `ConfigError::Figment` if it cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::InvalidValue {
                field: "config".into(),
                reason: format!("{} does not exist", path.display()),
            });
        }
        Self::load_dotenv();
        Self::layered()
            .merge(Toml::file(path))
            .merge(Self::env())
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment() -> Figment {
        Self::layered().merge(Self::env())
    }

    /// Defaults plus discovered TOML files, without the environment layer.
    fn layered() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".haven/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    fn env() -> Env {
        Env::prefixed("HAVEN_").split("__")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("haven").join("config.toml"))
    }

    /// Load `.env` from the current directory or the workspace root.
    fn load_dotenv() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = HavenConfig::default();
        assert!(!config.backend.is_configured());
        assert_eq!(config.routes.login, "/login");
        assert_eq!(config.admin.bind, "127.0.0.1:8787");
    }

    #[test]
    fn missing_explicit_file_is_invalid_value() {
        let err = HavenConfig::load_from(std::path::Path::new("/nonexistent/haven.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
