use anyhow::Context;
use haven_admin::AdminState;
use haven_config::HavenConfig;

use crate::cli::subcommands::AdminCommands;

pub async fn handle(action: &AdminCommands, config: &HavenConfig) -> anyhow::Result<()> {
    match action {
        AdminCommands::Serve { bind } => {
            let state = AdminState::from_config(&config.backend).context(
                "admin API needs backend.url, backend.anon_key and backend.service_role_key",
            )?;
            let bind = bind.as_deref().unwrap_or(&config.admin.bind);
            haven_admin::serve(bind, state)
                .await
                .with_context(|| format!("admin API failed on {bind}"))
        }
    }
}
