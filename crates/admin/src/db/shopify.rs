//! Shopify OAuth token repository for database operations.
//!
//! Stores the offline Admin API token issued when a shop installs the app.

use inventory_manager_core::ShopDomain;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use super::RepositoryError;
use crate::shopify::OAuthToken;

// =============================================================================
// Types
// =============================================================================

/// A Shopify OAuth token.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyToken {
    /// Shop the token was issued for.
    pub shop: ShopDomain,
    /// Offline access token (redacted in debug output).
    pub access_token: SecretString,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Unix timestamp when token was obtained.
    pub obtained_at: i64,
}

impl std::fmt::Debug for ShopifyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyToken")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Internal row type for `PostgreSQL` queries.
#[derive(sqlx::FromRow)]
struct ShopifyTokenRow {
    shop: String,
    access_token: String,
    scope: String,
    obtained_at: i64,
}

impl TryFrom<ShopifyTokenRow> for ShopifyToken {
    type Error = RepositoryError;

    fn try_from(row: ShopifyTokenRow) -> Result<Self, Self::Error> {
        let shop = ShopDomain::parse(&row.shop)
            .map_err(|e| RepositoryError::DataCorruption(format!("shop {}: {e}", row.shop)))?;

        Ok(Self {
            shop,
            access_token: SecretString::from(row.access_token),
            scopes: split_scopes(&row.scope),
            obtained_at: row.obtained_at,
        })
    }
}

/// Split a stored comma-separated scope list.
fn split_scopes(scope: &str) -> Vec<String> {
    scope
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl From<OAuthToken> for ShopifyToken {
    fn from(token: OAuthToken) -> Self {
        Self {
            scopes: split_scopes(&token.scope),
            shop: token.shop,
            access_token: token.access_token,
            obtained_at: token.obtained_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for Shopify OAuth token database operations.
pub struct ShopifyTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopifyTokenRepository<'a> {
    /// Create a new Shopify token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the token for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored shop is malformed.
    pub async fn get_by_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Option<ShopifyToken>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopifyTokenRow>(
            r"
            SELECT shop, access_token, scope, obtained_at
            FROM inventory.shopify_token
            WHERE shop = $1
            ",
        )
        .bind(shop.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(ShopifyToken::try_from).transpose()
    }

    /// Save or update the token for a shop.
    ///
    /// Uses upsert so a reinstall replaces the previous token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn save(&self, token: &ShopifyToken) -> Result<(), RepositoryError> {
        let scope = token.scopes.join(",");

        sqlx::query(
            r"
            INSERT INTO inventory.shopify_token (shop, access_token, scope, obtained_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(shop) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                scope = EXCLUDED.scope,
                obtained_at = EXCLUDED.obtained_at,
                updated_at = NOW()
            ",
        )
        .bind(token.shop.as_str())
        .bind(token.access_token.expose_secret())
        .bind(scope)
        .bind(token.obtained_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete the token for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, shop: &ShopDomain) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM inventory.shopify_token WHERE shop = $1")
            .bind(shop.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
