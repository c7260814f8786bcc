use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum AdminCommands {
    /// Serve the admin API (needs backend.service_role_key).
    Serve {
        /// Address to bind (defaults to admin.bind).
        #[arg(long)]
        bind: Option<String>,
    },
}
