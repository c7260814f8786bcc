use haven_auth::handoff_store::update;
use haven_config::HavenConfig;
use serde::Serialize;

use crate::bootstrap::handoff_store;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthSelectOrgArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthSelectOrgResponse {
    selected_org_id: String,
    selected_org_name: Option<String>,
}

pub fn handle(
    args: &AuthSelectOrgArgs,
    flags: &GlobalFlags,
    config: &HavenConfig,
) -> anyhow::Result<()> {
    let org_id = args.org_id.trim();
    if org_id.is_empty() {
        anyhow::bail!("auth select-org: organization ID must not be empty");
    }

    let store = handoff_store(config)?;
    let org_name = args.name.clone().unwrap_or_default();
    update(&store, |handoff| {
        handoff.remember_tenant(org_id, org_name.clone());
    })?;

    output(
        &AuthSelectOrgResponse {
            selected_org_id: org_id.to_string(),
            selected_org_name: Some(org_name).filter(|name| !name.is_empty()),
        },
        flags.format,
    )
}
