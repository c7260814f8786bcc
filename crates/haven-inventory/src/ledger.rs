use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::InventoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// One stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub item: String,
    pub category: String,
    pub quantity: u32,
    pub direction: Direction,
}

impl Transaction {
    /// Quantity with the sign of its direction.
    #[must_use]
    pub fn signed_quantity(&self) -> i64 {
        let quantity = i64::from(self.quantity);
        match self.direction {
            Direction::In => quantity,
            Direction::Out => -quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub item: String,
    pub category: String,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
}

/// Read a JSON array of transactions. Quantities must be non-negative and
/// fit in 32 bits.
///
/// # Errors
///
/// Returns `InventoryError::Read` if the file cannot be read and
/// `InventoryError::Parse` if it is not a valid transaction list.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, InventoryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let transactions: Vec<Transaction> =
        serde_json::from_str(&raw).map_err(|source| InventoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(count = transactions.len(), path = %path.display(), "loaded transactions");
    Ok(transactions)
}

/// Net stock per item, sorted by item name.
///
/// An item keeps the category of its first transaction.
#[must_use]
pub fn stock_levels(transactions: &[Transaction]) -> Vec<StockLevel> {
    let mut merged: HashMap<&str, StockLevel> = HashMap::new();
    for tx in transactions {
        let level = merged
            .entry(tx.item.as_str())
            .or_insert_with(|| StockLevel {
                item: tx.item.clone(),
                category: tx.category.clone(),
                stock: 0,
            });
        level.stock = level.stock.saturating_add(tx.signed_quantity());
    }

    let mut levels: Vec<StockLevel> = merged.into_values().collect();
    levels.sort_by(|a, b| a.item.cmp(&b.item));
    levels
}

/// Net movement per category, sorted by category name.
#[must_use]
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut merged: HashMap<&str, i64> = HashMap::new();
    for tx in transactions {
        let total = merged.entry(tx.category.as_str()).or_default();
        *total = total.saturating_add(tx.signed_quantity());
    }

    let mut totals: Vec<CategoryTotal> = merged
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| a.category.cmp(&b.category));
    totals
}

/// Items at or below `threshold`, lowest stock first, ties by name.
#[must_use]
pub fn low_stock(levels: &[StockLevel], threshold: i64) -> Vec<StockLevel> {
    let mut low: Vec<StockLevel> = levels
        .iter()
        .filter(|level| level.stock <= threshold)
        .cloned()
        .collect();
    low.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.item.cmp(&b.item)));
    low
}
