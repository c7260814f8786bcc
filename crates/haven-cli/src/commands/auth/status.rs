use haven_auth::{HandoffStore, SessionStore};
use haven_config::HavenConfig;
use serde::Serialize;

use crate::bootstrap::{Services, handoff_store};
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Default, Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    user_id: Option<String>,
    email: Option<String>,
    expires_at: Option<String>,
    token_source: Option<String>,
    selected_org_id: Option<String>,
    selected_org_name: Option<String>,
    note: Option<String>,
}

pub async fn handle(flags: &GlobalFlags, config: &HavenConfig) -> anyhow::Result<()> {
    let mut status = AuthStatusResponse::default();

    match handoff_store(config)?.load() {
        Ok(handoff) => {
            if let Some(tenant) = handoff.tenant() {
                status.selected_org_id = Some(tenant.org_id);
                status.selected_org_name = Some(tenant.org_name).filter(|name| !name.is_empty());
            }
        }
        Err(error) => status.note = Some(error.to_string()),
    }

    if !config.backend.is_configured() {
        status.note =
            Some("backend not configured (HAVEN_BACKEND__URL, HAVEN_BACKEND__ANON_KEY)".into());
        return output(&status, flags.format);
    }

    let services = Services::init(config)?;
    match services.sessions.get_session().await {
        Some(session) => {
            status.authenticated = true;
            status.user_id = Some(session.identity.user_id);
            status.email = session.identity.email;
            status.expires_at = Some(session.expires_at.to_rfc3339());
            status.token_source = services.tokens.detect_source();
        }
        None if status.note.is_none() => {
            status.note = Some("no valid session found".into());
        }
        None => {}
    }

    output(&status, flags.format)
}
