use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Clone, Debug, Subcommand)]
pub enum InventoryCommands {
    /// Stock per item, totals per category, and what is running low.
    Summary(InventoryArgs),
    /// Donor post listing low items.
    Outreach(InventoryArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InventoryArgs {
    /// JSON array of transactions.
    #[arg(long)]
    pub file: PathBuf,
    /// Low-stock threshold (defaults to general.low_stock_threshold).
    #[arg(long)]
    pub threshold: Option<i64>,
}
