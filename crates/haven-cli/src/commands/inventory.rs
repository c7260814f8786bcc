use haven_auth::HandoffStore;
use haven_config::HavenConfig;
use haven_inventory::{
    CategoryTotal, StockLevel, category_totals, load_transactions, low_stock, outreach_post,
    stock_levels,
};
use serde::Serialize;

use crate::bootstrap::handoff_store;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::InventoryCommands;
use crate::output::output;

#[derive(Serialize)]
struct InventorySummaryResponse {
    threshold: i64,
    items: Vec<StockLevel>,
    categories: Vec<CategoryTotal>,
    low: Vec<StockLevel>,
}

#[derive(Serialize)]
struct InventoryOutreachResponse {
    organization: String,
    low_items: usize,
    post: Option<String>,
}

pub fn handle(
    action: &InventoryCommands,
    flags: &GlobalFlags,
    config: &HavenConfig,
) -> anyhow::Result<()> {
    match action {
        InventoryCommands::Summary(args) => {
            let transactions = load_transactions(&args.file)?;
            let threshold = args.threshold.unwrap_or(config.general.low_stock_threshold);
            let items = stock_levels(&transactions);
            let low = low_stock(&items, threshold);
            output(
                &InventorySummaryResponse {
                    threshold,
                    categories: category_totals(&transactions),
                    items,
                    low,
                },
                flags.format,
            )
        }
        InventoryCommands::Outreach(args) => {
            let transactions = load_transactions(&args.file)?;
            let threshold = args.threshold.unwrap_or(config.general.low_stock_threshold);
            let low = low_stock(&stock_levels(&transactions), threshold);
            let organization = organization_name(config);
            output(
                &InventoryOutreachResponse {
                    post: outreach_post(&organization, &low),
                    low_items: low.len(),
                    organization,
                },
                flags.format,
            )
        }
    }
}

/// Name of the remembered organization, or the configured fallback.
fn organization_name(config: &HavenConfig) -> String {
    handoff_store(config)
        .ok()
        .and_then(|store| store.load().ok())
        .and_then(|handoff| handoff.tenant())
        .map(|tenant| tenant.org_name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| config.general.fallback_org_name.clone())
}
