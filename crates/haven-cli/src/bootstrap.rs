use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use haven_auth::{
    BackendClient, FileHandoffStore, RecordingNavigator, RemoteProfileReader, RemoteSessionStore,
    TokenStore,
};
use haven_config::HavenConfig;

pub fn load_config() -> anyhow::Result<HavenConfig> {
    HavenConfig::load_with_dotenv().context("failed to load haven configuration")
}

/// Directory holding the stored session and handoff state.
pub fn state_dir(config: &HavenConfig) -> anyhow::Result<PathBuf> {
    config
        .general
        .state_dir()
        .context("cannot determine home directory; set general.state_dir")
}

pub fn handoff_store(config: &HavenConfig) -> anyhow::Result<FileHandoffStore> {
    Ok(FileHandoffStore::new(state_dir(config)?))
}

/// Collaborators for commands that talk to the backend as the signed-in user.
pub struct Services {
    pub tokens: TokenStore,
    pub sessions: Arc<RemoteSessionStore>,
    pub profiles: Arc<RemoteProfileReader>,
    pub handoff: Arc<FileHandoffStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Services {
    pub fn init(config: &HavenConfig) -> anyhow::Result<Self> {
        let state_dir = state_dir(config)?;
        let client = BackendClient::new(&config.backend)
            .context("backend is not configured; set backend.url and backend.anon_key")?;

        tracing::debug!(
            state_dir = %state_dir.display(),
            backend = %config.backend.base_url(),
            "services ready"
        );
        let tokens = TokenStore::new(&state_dir);
        let sessions = Arc::new(RemoteSessionStore::new(client.clone(), tokens.clone()));
        let profiles = Arc::new(RemoteProfileReader::new(client, sessions.clone()));

        Ok(Self {
            tokens,
            sessions,
            profiles,
            handoff: Arc::new(FileHandoffStore::new(&state_dir)),
            navigator: Arc::new(RecordingNavigator::default()),
        })
    }
}
