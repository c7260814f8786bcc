use std::sync::Arc;

use haven_auth::BackendClient;
use haven_config::BackendConfig;

use crate::{AdminBackend, AdminError};

#[derive(Clone)]
pub struct AdminState {
    pub backend: Arc<dyn AdminBackend>,
}

impl AdminState {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self { backend }
    }

    /// State backed by the hosted backend's service credential.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Backend` if the service credential is missing
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &BackendConfig) -> Result<Self, AdminError> {
        let client = BackendClient::with_service_role(config)
            .map_err(|error| AdminError::Backend(error.to_string()))?;
        Ok(Self::new(Arc::new(client)))
    }
}
