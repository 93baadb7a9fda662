//! Persisted per-variant inventory settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MinStock, ProductId, ShopDomain, VariantId};

/// A settings row, unique per `(shop, variant_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct InventorySetting {
    /// Surrogate key.
    pub id: i32,
    /// Shop the row belongs to.
    pub shop: ShopDomain,
    /// Variant the threshold applies to.
    pub variant_id: VariantId,
    /// Parent product of the variant.
    pub product_id: ProductId,
    /// Low-stock threshold.
    pub min_stock: MinStock,
    /// When the row was seeded.
    pub created_at: DateTime<Utc>,
    /// When the threshold was last changed.
    pub updated_at: DateTime<Utc>,
}
