//! Inventory table composition.
//!
//! Turns the loader output (products in edge/node shape plus the shop's
//! settings rows) into the rows, counts and tones the inventory page shows.
//! Everything here is recomputed per request and never persisted.

mod selection;
mod sort;

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{
    Emphasis, InventorySetting, MinStock, ProductEdge, ProductStatus, Tone, VariantId,
};

pub use selection::Selection;
pub use sort::{SortColumn, SortDirection, SortState};

/// A variant decorated with its parent product and threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRow {
    pub id: VariantId,
    pub title: String,
    pub inventory_quantity: i64,
    pub product_title: String,
    pub product_status: ProductStatus,
    /// Stored threshold, `None` when the variant has no settings row yet.
    pub min_stock_threshold: Option<MinStock>,
}

impl VariantRow {
    /// Threshold in force for this row.
    #[must_use]
    pub fn effective_threshold(&self, default: MinStock) -> MinStock {
        self.min_stock_threshold.unwrap_or(default)
    }

    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.inventory_quantity == 0
    }

    /// Below threshold. Out-of-stock rows always count, even with a zero
    /// threshold.
    #[must_use]
    pub fn is_low_stock(&self, default: MinStock) -> bool {
        self.is_out_of_stock() || self.effective_threshold(default).exceeds(self.inventory_quantity)
    }

    /// Tone of the quantity cell: empty, below threshold, or healthy.
    #[must_use]
    pub fn quantity_tone(&self, default: MinStock) -> Tone {
        if self.is_out_of_stock() {
            Tone::Critical
        } else if self.is_low_stock(default) {
            Tone::Caution
        } else {
            Tone::Success
        }
    }

    #[must_use]
    pub fn quantity_emphasis(&self, default: MinStock) -> Emphasis {
        match self.quantity_tone(default) {
            Tone::Critical => Emphasis::Bold,
            Tone::Caution => Emphasis::Semibold,
            _ => Emphasis::Regular,
        }
    }

    /// Tone of the status badge.
    #[must_use]
    pub fn status_tone(&self) -> Tone {
        match self.product_status {
            ProductStatus::Active => Tone::Success,
            ProductStatus::Draft => Tone::Attention,
            _ => Tone::Warning,
        }
    }

    /// Initial value of the settings modal field.
    #[must_use]
    pub fn modal_seed(&self) -> i32 {
        self.min_stock_threshold.map_or(0, MinStock::get)
    }
}

/// Flatten products into one row per variant.
///
/// Each row carries the parent product's title and status and the threshold
/// from the matching settings row, if any. Untracked variants (null
/// quantity) are shown with a quantity of zero.
#[must_use]
pub fn flatten_variants(products: &[ProductEdge], settings: &[InventorySetting]) -> Vec<VariantRow> {
    let thresholds: HashMap<&VariantId, MinStock> = settings
        .iter()
        .map(|s| (&s.variant_id, s.min_stock))
        .collect();

    products
        .iter()
        .flat_map(|edge| {
            let product = &edge.node;
            product.variants().map(|variant| VariantRow {
                id: variant.id.clone(),
                title: variant.title.clone(),
                inventory_quantity: variant.inventory_quantity.unwrap_or(0),
                product_title: product.title.clone(),
                product_status: product.status.clone(),
                min_stock_threshold: thresholds.get(&variant.id).copied(),
            })
        })
        .collect()
}

/// Summary cards shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl InventorySummary {
    /// Count rows by stock state.
    #[must_use]
    pub fn from_rows(rows: &[VariantRow], default: MinStock) -> Self {
        Self {
            total: rows.len(),
            low_stock: rows.iter().filter(|r| r.is_low_stock(default)).count(),
            out_of_stock: rows.iter().filter(|r| r.is_out_of_stock()).count(),
        }
    }
}
