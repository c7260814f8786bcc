use haven_auth::SessionStore;
use haven_config::HavenConfig;
use serde::Serialize;

use crate::bootstrap::Services;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub async fn handle(flags: &GlobalFlags, config: &HavenConfig) -> anyhow::Result<()> {
    let services = Services::init(config)?;
    services.sessions.sign_out().await;
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
