use haven_auth::handoff_store::update;
use haven_config::HavenConfig;
use serde::Serialize;

use crate::bootstrap::handoff_store;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthNoticeResponse {
    notice: Option<String>,
}

pub fn handle(flags: &GlobalFlags, config: &HavenConfig) -> anyhow::Result<()> {
    let store = handoff_store(config)?;
    let notice = update(&store, haven_core::Handoff::take_auth_error)?;
    output(&AuthNoticeResponse { notice }, flags.format)
}
