//! Integration tests for the threshold action.

#![allow(clippy::unwrap_used)]

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use inventory_manager_admin::error::{AppError, JsonError};
use inventory_manager_admin::services::{
    ThresholdForm, ThresholdUpdate, load_inventory, update_threshold,
};
use inventory_manager_core::{DEFAULT_MIN_STOCK, MinStock, ShopDomain, VariantId};
use inventory_manager_integration_tests::{InMemorySettingsStore, sample_products};

fn shop() -> ShopDomain {
    ShopDomain::parse("pineapple.myshopify.com").unwrap()
}

fn form(variant_id: &str, min_stock: &str) -> ThresholdForm {
    ThresholdForm {
        variant_id: variant_id.to_string(),
        min_stock: min_stock.to_string(),
    }
}

async fn seeded_store() -> InMemorySettingsStore {
    let store = InMemorySettingsStore::new();
    load_inventory(&sample_products(), &store, &shop(), DEFAULT_MIN_STOCK)
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_action_updates_only_target_row() {
    let store = seeded_store().await;
    let before = store.snapshot();

    let update = ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/11", "12")).unwrap();
    let updated = update_threshold(&store, &shop(), &update).await.unwrap();
    assert_eq!(updated.min_stock, MinStock::new(12));

    let after = store.snapshot();
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        if new.variant_id.as_str() == "gid://shopify/ProductVariant/11" {
            assert_eq!(new.min_stock, MinStock::new(12));
            assert_eq!(new.id, old.id);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[tokio::test]
async fn test_action_accepts_zero() {
    let store = seeded_store().await;
    let update = ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/12", "0")).unwrap();
    update_threshold(&store, &shop(), &update).await.unwrap();

    assert_eq!(
        store.min_stock(&shop(), "gid://shopify/ProductVariant/12"),
        Some(MinStock::new(0))
    );
}

#[tokio::test]
async fn test_action_missing_row_is_not_found() {
    let store = seeded_store().await;
    let update = ThresholdUpdate {
        variant_id: VariantId::new_unchecked("gid://shopify/ProductVariant/999"),
        min_stock: MinStock::new(4),
    };

    let err = update_threshold(&store, &shop(), &update).await.unwrap_err();
    assert!(matches!(err, AppError::NotFoundSetting(ref id) if id.numeric_id() == 999));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_action_does_not_cross_shops() {
    let store = seeded_store().await;
    let other = ShopDomain::parse("mango.myshopify.com").unwrap();
    let update = ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/11", "9")).unwrap();

    let err = update_threshold(&store, &other, &update).await.unwrap_err();
    assert!(matches!(err, AppError::NotFoundSetting(_)));
    assert_eq!(
        store.min_stock(&shop(), "gid://shopify/ProductVariant/11"),
        Some(DEFAULT_MIN_STOCK)
    );
}

#[tokio::test]
async fn test_action_rejects_non_numeric_threshold() {
    let store = seeded_store().await;
    let before = store.snapshot();

    let err = ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/11", "abc")).unwrap_err();
    assert!(matches!(err, AppError::ValidationFailure(_)));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing reached the store
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn test_action_error_body() {
    let err = ThresholdUpdate::parse(&form("gid://shopify/ProductVariant/11", "abc")).unwrap_err();
    let response = JsonError(err).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "validation_failure");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input: minStock"));
}
