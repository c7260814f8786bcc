//! Where the [`Handoff`] lives between screens (or CLI invocations).

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use haven_core::Handoff;

use crate::AuthError;

const HANDOFF_FILE_NAME: &str = "handoff.json";

pub trait HandoffStore: Send + Sync {
    /// Current handoff; a store that was never written yields the default.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HandoffStore` if stored state cannot be read.
    fn load(&self) -> Result<Handoff, AuthError>;

    /// Replace the stored handoff.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HandoffStore` if the state cannot be written.
    fn save(&self, handoff: &Handoff) -> Result<(), AuthError>;
}

/// Read-modify-write helper over any store.
///
/// # Errors
///
/// Propagates load and save failures.
pub fn update<R>(
    store: &dyn HandoffStore,
    change: impl FnOnce(&mut Handoff) -> R,
) -> Result<R, AuthError> {
    let mut handoff = store.load()?;
    let result = change(&mut handoff);
    store.save(&handoff)?;
    Ok(result)
}

/// JSON file under the state directory.
#[derive(Debug, Clone)]
pub struct FileHandoffStore {
    path: PathBuf,
}

impl FileHandoffStore {
    #[must_use]
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join(HANDOFF_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl HandoffStore for FileHandoffStore {
    fn load(&self) -> Result<Handoff, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Handoff::default());
            }
            Err(error) => {
                return Err(AuthError::HandoffStore(format!(
                    "read {}: {error}",
                    self.path.display()
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Handoff::default());
        }

        serde_json::from_str(&raw).map_err(|e| {
            AuthError::HandoffStore(format!("parse {}: {e}", self.path.display()))
        })
    }

    fn save(&self, handoff: &Handoff) -> Result<(), AuthError> {
        if handoff.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| {
                    AuthError::HandoffStore(format!("remove {}: {e}", self.path.display()))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::HandoffStore(format!("mkdir {}: {e}", parent.display()))
            })?;
        }
        let payload = serde_json::to_string_pretty(handoff)
            .map_err(|e| AuthError::HandoffStore(format!("serialize handoff: {e}")))?;
        fs::write(&self.path, payload)
            .map_err(|e| AuthError::HandoffStore(format!("write {}: {e}", self.path.display())))
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryHandoffStore {
    inner: Mutex<Handoff>,
}

impl MemoryHandoffStore {
    #[must_use]
    pub fn with(handoff: Handoff) -> Self {
        Self {
            inner: Mutex::new(handoff),
        }
    }

    /// Current value; a poisoned lock still yields the last written state.
    #[must_use]
    pub fn snapshot(&self) -> Handoff {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl HandoffStore for MemoryHandoffStore {
    fn load(&self) -> Result<Handoff, AuthError> {
        Ok(self.snapshot())
    }

    fn save(&self, handoff: &Handoff) -> Result<(), AuthError> {
        *self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = handoff.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_loads_default() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileHandoffStore::new(tmp.path());
        assert_eq!(store.load().expect("load"), Handoff::default());
    }

    #[test]
    fn file_roundtrip_and_one_shot_error() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileHandoffStore::new(tmp.path().join("nested"));

        update(&store, |h| {
            h.remember_tenant("org-1", "Northside");
            h.set_auth_error("wrong organization");
        })
        .expect("update");

        let taken = update(&store, Handoff::take_auth_error).expect("take");
        assert_eq!(taken.as_deref(), Some("wrong organization"));

        let again = update(&store, Handoff::take_auth_error).expect("take");
        assert!(again.is_none());

        let tenant = store.load().expect("load").tenant().expect("tenant");
        assert_eq!(tenant.org_id, "org-1");
    }

    #[test]
    fn saving_empty_handoff_removes_file() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileHandoffStore::new(tmp.path());

        update(&store, |h| h.set_invite_code("INV-1")).expect("update");
        assert!(store.path().exists());

        update(&store, Handoff::clear_invite).expect("update");
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileHandoffStore::new(tmp.path());
        std::fs::write(store.path(), "{not json").expect("write");
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("handoff store error"));
    }

    #[test]
    fn memory_store_keeps_last_save() {
        let store = MemoryHandoffStore::default();
        update(&store, |h| h.remember_tenant("org-2", "Eastside")).expect("update");
        assert_eq!(
            store.snapshot().tenant().map(|t| t.org_name).as_deref(),
            Some("Eastside")
        );
    }
}
