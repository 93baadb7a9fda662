//! Inventory page loader and threshold action.
//!
//! The loader reads products from Shopify, seeds a settings row for every
//! variant the shop has not seen before, and returns products and settings
//! together. The action validates the threshold form and updates one row.
//!
//! Both run against the [`ProductSource`] and [`SettingsStore`] traits so
//! they can be exercised without Shopify or Postgres.

use std::future::Future;

use inventory_manager_core::{
    InventorySetting, MinStock, ProductEdge, ShopDomain, VariantId,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{InventorySettingRepository, RepositoryError, SettingSeed, ShopifyToken};
use crate::error::AppError;
use crate::shopify::{AdminClient, AdminShopifyError};

// =============================================================================
// Seams
// =============================================================================

/// Where the loader gets products from.
pub trait ProductSource {
    /// First page of products, in edge/node shape.
    fn fetch_products(
        &self,
    ) -> impl Future<Output = Result<Vec<ProductEdge>, AdminShopifyError>> + Send;
}

/// Persistence for per-variant settings.
pub trait SettingsStore {
    /// Insert `min_stock` rows for seeds the shop has no row for.
    fn seed_missing(
        &self,
        shop: &ShopDomain,
        seeds: &[SettingSeed],
        min_stock: MinStock,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Every row for the shop.
    fn list_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> impl Future<Output = Result<Vec<InventorySetting>, RepositoryError>> + Send;

    /// Set one variant's threshold; `RepositoryError::NotFound` if the row is missing.
    fn update_min_stock(
        &self,
        shop: &ShopDomain,
        variant_id: &VariantId,
        min_stock: MinStock,
    ) -> impl Future<Output = Result<InventorySetting, RepositoryError>> + Send;
}

impl SettingsStore for InventorySettingRepository<'_> {
    async fn seed_missing(
        &self,
        shop: &ShopDomain,
        seeds: &[SettingSeed],
        min_stock: MinStock,
    ) -> Result<u64, RepositoryError> {
        Self::seed_missing(self, shop, seeds, min_stock).await
    }

    async fn list_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<InventorySetting>, RepositoryError> {
        Self::list_for_shop(self, shop).await
    }

    async fn update_min_stock(
        &self,
        shop: &ShopDomain,
        variant_id: &VariantId,
        min_stock: MinStock,
    ) -> Result<InventorySetting, RepositoryError> {
        Self::update_min_stock(self, shop, variant_id, min_stock).await
    }
}

/// The Admin API, bound to one shop's token.
pub struct ShopCatalog<'a> {
    client: &'a AdminClient,
    token: &'a ShopifyToken,
}

impl<'a> ShopCatalog<'a> {
    #[must_use]
    pub const fn new(client: &'a AdminClient, token: &'a ShopifyToken) -> Self {
        Self { client, token }
    }
}

impl ProductSource for ShopCatalog<'_> {
    async fn fetch_products(&self) -> Result<Vec<ProductEdge>, AdminShopifyError> {
        self.client
            .inventory_products(&self.token.shop, &self.token.access_token)
            .await
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Loader output, also served as JSON by the data endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoaderData {
    pub products: Vec<ProductEdge>,
    pub settings: Vec<InventorySetting>,
}

/// Variants of `products` as seeds for the settings table.
#[must_use]
pub fn seeds_for(products: &[ProductEdge]) -> Vec<SettingSeed> {
    products
        .iter()
        .flat_map(|edge| {
            edge.node.variants().map(|variant| SettingSeed {
                variant_id: variant.id.clone(),
                product_id: edge.node.id.clone(),
            })
        })
        .collect()
}

/// Run the read path for a shop.
///
/// After this returns, every variant in `products` has exactly one settings
/// row for `shop`.
///
/// # Errors
///
/// Returns `AppError::NetworkFailure` if Shopify cannot be queried and
/// `AppError::Database` if seeding or listing fails.
#[instrument(skip(source, store), fields(shop = %shop))]
pub async fn load_inventory<P, S>(
    source: &P,
    store: &S,
    shop: &ShopDomain,
    default_min_stock: MinStock,
) -> Result<LoaderData, AppError>
where
    P: ProductSource + Sync,
    S: SettingsStore + Sync,
{
    let products = source.fetch_products().await?;

    let seeds = seeds_for(&products);
    let created = store.seed_missing(shop, &seeds, default_min_stock).await?;
    if created > 0 {
        tracing::info!(created, "Seeded inventory settings");
    }

    let settings = store.list_for_shop(shop).await?;

    tracing::debug!(
        products = products.len(),
        variants = seeds.len(),
        settings = settings.len(),
        "Inventory loaded"
    );

    Ok(LoaderData { products, settings })
}

// =============================================================================
// Action
// =============================================================================

/// Raw threshold form as posted by the settings modal.
///
/// Fields default to empty so a missing field is reported as a validation
/// failure rather than a form rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdForm {
    #[serde(rename = "variantId", default)]
    pub variant_id: String,
    #[serde(rename = "minStock", default)]
    pub min_stock: String,
}

/// A validated threshold change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdUpdate {
    pub variant_id: VariantId,
    pub min_stock: MinStock,
}

impl ThresholdUpdate {
    /// Validate the posted form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ValidationFailure` if the variant id is not a
    /// variant GID or the threshold is not a non-negative whole number.
    pub fn parse(form: &ThresholdForm) -> Result<Self, AppError> {
        let variant_id = VariantId::parse(&form.variant_id)
            .map_err(|e| AppError::ValidationFailure(format!("variantId: {e}")))?;
        let min_stock = MinStock::parse(&form.min_stock)
            .map_err(|e| AppError::ValidationFailure(format!("minStock: {e}")))?;

        Ok(Self {
            variant_id,
            min_stock,
        })
    }
}

/// Run the write path: update the threshold of one `(shop, variant)` row.
///
/// # Errors
///
/// Returns `AppError::NotFoundSetting` if the shop has no row for the
/// variant and `AppError::Database` if the update fails.
#[instrument(skip(store), fields(shop = %shop, variant_id = %update.variant_id))]
pub async fn update_threshold<S>(
    store: &S,
    shop: &ShopDomain,
    update: &ThresholdUpdate,
) -> Result<InventorySetting, AppError>
where
    S: SettingsStore + Sync,
{
    match store
        .update_min_stock(shop, &update.variant_id, update.min_stock)
        .await
    {
        Ok(setting) => {
            tracing::info!(min_stock = %setting.min_stock, "Updated inventory threshold");
            Ok(setting)
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFoundSetting(update.variant_id.clone())),
        Err(e) => Err(AppError::Database(e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(variant_id: &str, min_stock: &str) -> ThresholdForm {
        ThresholdForm {
            variant_id: variant_id.to_string(),
            min_stock: min_stock.to_string(),
        }
    }

    #[test]
    fn test_threshold_update_parses_valid_form() {
        let update =
            ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/42", " 12 ")).unwrap();
        assert_eq!(update.variant_id.numeric_id(), 42);
        assert_eq!(update.min_stock.get(), 12);
    }

    #[test]
    fn test_threshold_update_rejects_bad_min_stock() {
        for bad in ["abc", "", "2.5", "-1", "3abc"] {
            let err = ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/42", bad))
                .unwrap_err();
            assert!(
                matches!(err, AppError::ValidationFailure(ref m) if m.starts_with("minStock")),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_threshold_update_rejects_bad_variant() {
        let err = ThresholdUpdate::parse(&form("gid://shopify/Product/42", "3")).unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(ref m) if m.starts_with("variantId")));

        let err = ThresholdUpdate::parse(&ThresholdForm::default()).unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
    }

    #[test]
    fn test_threshold_form_field_names() {
        let parsed: ThresholdForm = serde_json::from_value(serde_json::json!({
            "variantId": "gid://shopify/ProductVariant/1",
            "minStock": "4"
        }))
        .unwrap();
        assert_eq!(parsed.variant_id, "gid://shopify/ProductVariant/1");
        assert_eq!(parsed.min_stock, "4");
    }
}
