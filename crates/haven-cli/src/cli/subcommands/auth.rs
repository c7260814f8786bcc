use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password, then route to the landing view.
    Login(AuthLoginArgs),
    /// Sign out and clear the stored session.
    Logout,
    /// Show current auth status and the remembered organization.
    Status,
    /// Remember the organization to sign in to.
    SelectOrg(AuthSelectOrgArgs),
    /// Print (and clear) the last sign-in problem, if any.
    Notice,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Organization ID to sign in to; remembered before signing in.
    #[arg(long)]
    pub org: Option<String>,
    /// Display name for `--org`.
    #[arg(long, requires = "org")]
    pub org_name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthSelectOrgArgs {
    /// Organization ID.
    pub org_id: String,
    /// Display name shown in messages.
    #[arg(long)]
    pub name: Option<String>,
}
