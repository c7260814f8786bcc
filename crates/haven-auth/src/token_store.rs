//! Persistence for the current session.
//!
//! The serialized session lives in the OS keychain when one is available and
//! falls back to a `0600` file under the state directory otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use haven_core::Session;

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "haven-cli";
const KEYRING_USER: &str = "session";
const SESSION_FILE_NAME: &str = "session.json";

/// Returns the keyring service name.
///
/// Defaults to `"haven-cli"`. Override via `HAVEN_KEYRING_SERVICE` so test
/// runs never touch real credentials.
fn keyring_service() -> String {
    std::env::var("HAVEN_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    state_dir: PathBuf,
    use_keyring: bool,
}

impl TokenStore {
    /// Keychain first, file under `state_dir` as fallback.
    #[must_use]
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            use_keyring: true,
        }
    }

    /// File storage only.
    #[must_use]
    pub fn file_only(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            use_keyring: false,
        }
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE_NAME)
    }

    /// Store a session. Falls back to file if the keychain is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if both keychain and file storage fail.
    pub fn store(&self, session: &Session) -> Result<(), AuthError> {
        let payload = serde_json::to_string(session)
            .map_err(|e| AuthError::TokenStore(format!("serialize session: {e}")))?;

        if self.use_keyring {
            match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
                Ok(entry) => match entry.set_password(&payload) {
                    Ok(()) => return Ok(()),
                    Err(error) => {
                        tracing::warn!(%error, "keyring store failed; falling back to file");
                    }
                },
                Err(error) => {
                    tracing::warn!(%error, "keyring unavailable; falling back to file");
                }
            }
        }

        store_file(&self.session_path(), &payload)
    }

    /// Load the stored session. Priority: keychain → file.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        if self.use_keyring
            && let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
            && let Ok(payload) = entry.get_password()
            && let Some(session) = decode(&payload)
        {
            return Some(session);
        }

        load_file(&self.session_path()).and_then(|payload| decode(&payload))
    }

    /// Delete the stored session from keychain and file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if the session file cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if self.use_keyring
            && let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        {
            let _ = entry.delete_credential();
        }

        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                AuthError::TokenStore(format!("failed to delete {}: {e}", path.display()))
            })?;
        }

        Ok(())
    }

    /// Which tier the current session came from (for status display).
    #[must_use]
    pub fn detect_source(&self) -> Option<String> {
        if self.use_keyring
            && let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
            && entry.get_password().is_ok_and(|p| decode(&p).is_some())
        {
            return Some("keyring".into());
        }
        if load_file(&self.session_path()).is_some_and(|p| decode(&p).is_some()) {
            return Some("file".into());
        }
        None
    }
}

fn decode(payload: &str) -> Option<Session> {
    match serde_json::from_str(payload) {
        Ok(session) => Some(session),
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable stored session");
            None
        }
    }
}

// --- Private file helpers ---

fn store_file(path: &Path, payload: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStore(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, payload)
        .map_err(|e| AuthError::TokenStore(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStore(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

fn load_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .filter(|s| !s.trim().is_empty())
}
