//! # haven-inventory
//!
//! Turns a ledger of stock movements into per-item levels, per-category
//! totals, and a donor-facing post listing what is running low.

mod error;
mod ledger;
mod outreach;

pub use error::InventoryError;
pub use ledger::{
    CategoryTotal, Direction, StockLevel, Transaction, category_totals, load_transactions,
    low_stock, stock_levels,
};
pub use outreach::outreach_post;
