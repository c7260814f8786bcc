pub mod admin;
pub mod auth;
pub mod inventory;
pub mod open;

use haven_config::HavenConfig;

use crate::cli::{Commands, GlobalFlags};

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    flags: &GlobalFlags,
    config: &HavenConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, flags, config).await,
        Commands::Open(args) => open::handle(&args, flags, config).await,
        Commands::Inventory { action } => inventory::handle(&action, flags, config),
        Commands::Admin { action } => admin::handle(&action, config).await,
    }
}
