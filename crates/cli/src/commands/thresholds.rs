//! Threshold maintenance commands.
//!
//! # Usage
//!
//! ```bash
//! im-cli thresholds list -s my-store.myshopify.com
//! im-cli thresholds set -s my-store.myshopify.com -v gid://shopify/ProductVariant/1 -m 8
//! ```
//!
//! `set` goes through the same validation and update path as the inventory
//! page, so it only changes rows the page has already seeded.

use inventory_manager_admin::db::InventorySettingRepository;
use inventory_manager_admin::error::AppError;
use inventory_manager_admin::services::{ThresholdForm, ThresholdUpdate, update_threshold};
use inventory_manager_core::{InventorySetting, ShopDomain, ShopDomainError};
use thiserror::Error;

use super::{CommandError, connect};

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Invalid shop: {0}")]
    InvalidShop(#[from] ShopDomainError),

    #[error(transparent)]
    App(#[from] AppError),
}

/// One line of `thresholds list` output.
fn format_row(setting: &InventorySetting) -> String {
    format!(
        "{:<48} {:<40} {:>6}  {}",
        setting.variant_id.as_str(),
        setting.product_id.as_str(),
        setting.min_stock.get(),
        setting.updated_at.format("%Y-%m-%d %H:%M")
    )
}

/// Print every stored threshold for a shop.
pub async fn list(shop: &str) -> Result<(), ThresholdError> {
    let shop = ShopDomain::parse(shop)?;
    let pool = connect().await?;

    let settings = InventorySettingRepository::new(&pool)
        .list_for_shop(&shop)
        .await
        .map_err(AppError::from)?;

    tracing::info!(shop = %shop, count = settings.len(), "Loaded thresholds");

    #[allow(clippy::print_stdout)]
    for setting in &settings {
        println!("{}", format_row(setting));
    }

    Ok(())
}

/// Update one variant's threshold.
pub async fn set(shop: &str, variant: &str, min_stock: &str) -> Result<(), ThresholdError> {
    let shop = ShopDomain::parse(shop)?;
    let update = ThresholdUpdate::parse(&ThresholdForm {
        variant_id: variant.to_owned(),
        min_stock: min_stock.to_owned(),
    })?;

    let pool = connect().await?;
    let setting =
        update_threshold(&InventorySettingRepository::new(&pool), &shop, &update).await?;

    tracing::info!(
        "Threshold updated! Shop: {}, Variant: {}, Min stock: {}",
        shop,
        setting.variant_id,
        setting.min_stock
    );
    Ok(())
}
