mod login;
mod logout;
mod notice;
mod select_org;
mod status;

use haven_config::HavenConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `haven auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &HavenConfig,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config).await,
        AuthCommands::Logout => logout::handle(flags, config).await,
        AuthCommands::Status => status::handle(flags, config).await,
        AuthCommands::SelectOrg(args) => select_org::handle(args, flags, config),
        AuthCommands::Notice => notice::handle(flags, config),
    }
}
