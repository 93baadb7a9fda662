//! Inventory settings repository.
//!
//! One row per `(shop, variant_id)`. Rows are seeded the first time the
//! inventory page sees a variant, updated by the threshold form, and never
//! deleted here.

use inventory_manager_core::{InventorySetting, MinStock, ProductId, ShopDomain, VariantId};
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

const SETTING_COLUMNS: &str =
    "id, shop, variant_id, product_id, min_stock, created_at, updated_at";

/// A variant observed in the product query, to be seeded if missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingSeed {
    pub variant_id: VariantId,
    pub product_id: ProductId,
}

/// Repository for inventory settings.
pub struct InventorySettingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventorySettingRepository<'a> {
    /// Create a new inventory settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a row with `min_stock` for every seed the shop does not have yet.
    ///
    /// Existing rows are left untouched. Returns the number of rows created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, seeds), fields(shop = %shop, seeds = seeds.len()))]
    pub async fn seed_missing(
        &self,
        shop: &ShopDomain,
        seeds: &[SettingSeed],
        min_stock: MinStock,
    ) -> Result<u64, RepositoryError> {
        if seeds.is_empty() {
            return Ok(0);
        }

        let (variant_ids, product_ids): (Vec<String>, Vec<String>) = seeds
            .iter()
            .map(|seed| {
                (
                    seed.variant_id.as_str().to_owned(),
                    seed.product_id.as_str().to_owned(),
                )
            })
            .unzip();

        let result = sqlx::query(
            r"
            INSERT INTO inventory.inventory_setting (shop, variant_id, product_id, min_stock)
            SELECT $1, seed.variant_id, seed.product_id, $4
            FROM UNNEST($2::text[], $3::text[]) AS seed(variant_id, product_id)
            ON CONFLICT (shop, variant_id) DO NOTHING
            ",
        )
        .bind(shop.as_str())
        .bind(&variant_ids)
        .bind(&product_ids)
        .bind(min_stock)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List every settings row for a shop, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(shop = %shop))]
    pub async fn list_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<InventorySetting>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventorySetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM inventory.inventory_setting WHERE shop = $1 ORDER BY id"
        ))
        .bind(shop.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Set the threshold of one variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop has no row for the
    /// variant, or `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(shop = %shop, variant_id = %variant_id, min_stock = %min_stock))]
    pub async fn update_min_stock(
        &self,
        shop: &ShopDomain,
        variant_id: &VariantId,
        min_stock: MinStock,
    ) -> Result<InventorySetting, RepositoryError> {
        sqlx::query_as::<_, InventorySetting>(&format!(
            "UPDATE inventory.inventory_setting \
             SET min_stock = $3, updated_at = NOW() \
             WHERE shop = $1 AND variant_id = $2 \
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(shop.as_str())
        .bind(variant_id.as_str())
        .bind(min_stock)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
