//! Database tests for the inventory settings repository.
//!
//! Each test gets a fresh database with the admin migrations applied.
//! Requires `DATABASE_URL` pointing at a Postgres server.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use inventory_manager_admin::db::{InventorySettingRepository, RepositoryError, SettingSeed};
use inventory_manager_admin::error::AppError;
use inventory_manager_admin::services::{
    ThresholdForm, ThresholdUpdate, load_inventory, update_threshold,
};
use inventory_manager_core::{DEFAULT_MIN_STOCK, MinStock, ProductId, ShopDomain, VariantId};
use inventory_manager_integration_tests::sample_products;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn shop() -> ShopDomain {
    ShopDomain::parse("pineapple.myshopify.com").unwrap()
}

fn other_shop() -> ShopDomain {
    ShopDomain::parse("mango.myshopify.com").unwrap()
}

fn seed(variant: u32, product: u32) -> SettingSeed {
    SettingSeed {
        variant_id: VariantId::new_unchecked(format!("gid://shopify/ProductVariant/{variant}")),
        product_id: ProductId::new_unchecked(format!("gid://shopify/Product/{product}")),
    }
}

fn seeds() -> Vec<SettingSeed> {
    vec![seed(11, 1), seed(12, 1), seed(21, 2)]
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_seed_stores_each_column(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);

    let created = repo
        .seed_missing(&shop(), &seeds(), MinStock::new(7))
        .await
        .unwrap();
    assert_eq!(created, 3);

    let rows = repo.list_for_shop(&shop()).await.unwrap();
    assert_eq!(rows.len(), 3);

    let hat = rows
        .iter()
        .find(|r| r.variant_id.as_str() == "gid://shopify/ProductVariant/21")
        .unwrap();
    assert_eq!(hat.shop, shop());
    assert_eq!(hat.product_id.as_str(), "gid://shopify/Product/2");
    assert_eq!(hat.min_stock, MinStock::new(7));
}

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_seed_twice_keeps_one_row_per_variant(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);

    repo.seed_missing(&shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    let created = repo
        .seed_missing(&shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    assert_eq!(created, 0);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM inventory.inventory_setting WHERE shop = $1",
    )
    .bind(shop().as_str())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 3);
}

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_seed_leaves_existing_thresholds(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);
    let large = seed(12, 1);

    repo.seed_missing(&shop(), std::slice::from_ref(&large), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    repo.update_min_stock(&shop(), &large.variant_id, MinStock::new(40))
        .await
        .unwrap();

    let created = repo
        .seed_missing(&shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    assert_eq!(created, 2);

    let rows = repo.list_for_shop(&shop()).await.unwrap();
    let stored = rows.iter().find(|r| r.variant_id == large.variant_id).unwrap();
    assert_eq!(stored.min_stock, MinStock::new(40));
}

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_rows_are_scoped_to_shop(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);

    repo.seed_missing(&shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    let created = repo
        .seed_missing(&other_shop(), &seeds()[..1], DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    assert_eq!(created, 1);

    assert_eq!(repo.list_for_shop(&shop()).await.unwrap().len(), 3);
    let other = repo.list_for_shop(&other_shop()).await.unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].shop, other_shop());
}

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_seed_with_no_variants(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);
    assert_eq!(
        repo.seed_missing(&shop(), &[], DEFAULT_MIN_STOCK)
            .await
            .unwrap(),
        0
    );
    assert!(repo.list_for_shop(&shop()).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_update_changes_only_target_row(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);
    repo.seed_missing(&shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    repo.seed_missing(&other_shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();

    let target = seed(11, 1).variant_id;
    let updated = repo
        .update_min_stock(&shop(), &target, MinStock::new(0))
        .await
        .unwrap();
    assert_eq!(updated.variant_id, target);
    assert_eq!(updated.min_stock, MinStock::new(0));
    assert!(updated.updated_at >= updated.created_at);

    for row in repo.list_for_shop(&shop()).await.unwrap() {
        let expected = if row.variant_id == target {
            MinStock::new(0)
        } else {
            DEFAULT_MIN_STOCK
        };
        assert_eq!(row.min_stock, expected);
    }
    assert!(
        repo.list_for_shop(&other_shop())
            .await
            .unwrap()
            .iter()
            .all(|row| row.min_stock == DEFAULT_MIN_STOCK)
    );
}

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_update_missing_row_is_not_found(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);
    repo.seed_missing(&other_shop(), &seeds(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();

    let result = repo
        .update_min_stock(&shop(), &seed(11, 1).variant_id, MinStock::new(3))
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

// ---------------------------------------------------------------------------
// Schema constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_duplicate_variant_is_rejected(pool: PgPool) {
    let insert = "INSERT INTO inventory.inventory_setting (shop, variant_id, product_id) \
                  VALUES ($1, 'gid://shopify/ProductVariant/11', 'gid://shopify/Product/1')";

    sqlx::query(insert)
        .bind(shop().as_str())
        .execute(&pool)
        .await
        .unwrap();
    assert!(
        sqlx::query(insert)
            .bind(shop().as_str())
            .execute(&pool)
            .await
            .is_err()
    );
}

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_negative_threshold_is_rejected(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO inventory.inventory_setting (shop, variant_id, product_id, min_stock) \
         VALUES ($1, 'gid://shopify/ProductVariant/11', 'gid://shopify/Product/1', -1)",
    )
    .bind(shop().as_str())
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Loader and action against Postgres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../admin/migrations")]
async fn test_loader_and_action_round_trip(pool: PgPool) {
    let repo = InventorySettingRepository::new(&pool);

    let first = load_inventory(&sample_products(), &repo, &shop(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    assert_eq!(first.settings.len(), 3);

    let update = ThresholdUpdate::parse(&ThresholdForm {
        variant_id: "gid://shopify/ProductVariant/12".to_string(),
        min_stock: "25".to_string(),
    })
    .unwrap();
    update_threshold(&repo, &shop(), &update).await.unwrap();

    let second = load_inventory(&sample_products(), &repo, &shop(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    assert_eq!(second.settings.len(), 3);
    let large = second
        .settings
        .iter()
        .find(|s| s.variant_id.as_str() == "gid://shopify/ProductVariant/12")
        .unwrap();
    assert_eq!(large.min_stock, MinStock::new(25));

    let missing = ThresholdUpdate::parse(&ThresholdForm {
        variant_id: "gid://shopify/ProductVariant/999".to_string(),
        min_stock: "1".to_string(),
    })
    .unwrap();
    assert!(matches!(
        update_threshold(&repo, &shop(), &missing).await,
        Err(AppError::NotFoundSetting(_))
    ));
}
