use haven_auth::handoff_store::update;
use haven_auth::{HandoffStore, Outcome, PostAuthRouter, SessionStore};
use haven_config::HavenConfig;
use haven_core::{Role, Route};
use serde::Serialize;

use crate::bootstrap::Services;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    user_id: String,
    email: Option<String>,
    destination: Route,
    path: String,
    outcome: Outcome,
    role: Option<Role>,
    notice: Option<String>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &HavenConfig,
) -> anyhow::Result<()> {
    let services = Services::init(config)?;

    if let Some(org_id) = &args.org {
        let org_name = args.org_name.clone().unwrap_or_default();
        update(services.handoff.as_ref(), |handoff| {
            handoff.remember_tenant(org_id.clone(), org_name);
        })?;
    }

    let session = services
        .sessions
        .sign_in_with_password(&args.email, &args.password)
        .await?;

    let router = PostAuthRouter::new(
        services.sessions.clone(),
        services.profiles.clone(),
        services.handoff.clone(),
        services.navigator.clone(),
        config.general.fallback_org_name.clone(),
    );
    let result = router.reconcile().await;
    tracing::info!(
        destination = %result.destination,
        signed_out = result.outcome.signed_out(),
        "post-auth routing"
    );

    // Peek only; `haven auth notice` consumes it.
    let notice = if result.outcome.signed_out() {
        services
            .handoff
            .load()
            .ok()
            .and_then(|handoff| handoff.auth_error().map(String::from))
    } else {
        None
    };

    output(
        &AuthLoginResponse {
            user_id: session.identity.user_id,
            email: session.identity.email,
            destination: result.destination,
            path: config.routes.path(result.destination).to_string(),
            outcome: result.outcome,
            role: result.role,
            notice,
        },
        flags.format,
    )
}
