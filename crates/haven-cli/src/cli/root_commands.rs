use clap::Subcommand;

use crate::cli::subcommands::{AdminCommands, AuthCommands, InventoryCommands, OpenArgs};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign-in, sign-out, and tenant selection.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Open a protected view through its guards.
    Open(OpenArgs),
    /// Stock reports from a transaction ledger.
    Inventory {
        #[command(subcommand)]
        action: InventoryCommands,
    },
    /// Admin API.
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}
