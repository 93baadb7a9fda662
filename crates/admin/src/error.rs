//! Unified error handling for the inventory app.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inventory_manager_core::VariantId;
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::shopify::AdminShopifyError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify request failed (HTTP, GraphQL, rate limit or rejected token).
    #[error("Shopify request failed: {0}")]
    NetworkFailure(#[from] AdminShopifyError),

    /// No settings row exists for the variant in this shop.
    #[error("No inventory setting for variant {0}")]
    NotFoundSetting(VariantId),

    /// Form input could not be parsed.
    #[error("Invalid input: {0}")]
    ValidationFailure(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// No shop session, or no stored token for the shop.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// JSON body returned to the settings modal.
#[derive(Debug, Serialize)]
pub struct ActionErrorBody {
    pub success: bool,
    pub kind: &'static str,
    pub error: String,
}

impl AppError {
    /// Stable error kind reported to clients.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network_failure",
            Self::NotFoundSetting(_) => "not_found_setting",
            Self::ValidationFailure(_) => "validation_failure",
            Self::Database(_) => "database",
            Self::Unauthorized(_) => "unauthorized",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
            Self::NotFoundSetting(_) => StatusCode::NOT_FOUND,
            Self::ValidationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Whether the shop has to go through the install flow again.
    #[must_use]
    pub const fn requires_install(&self) -> bool {
        match self {
            Self::Unauthorized(_) => true,
            Self::NetworkFailure(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Message safe to show to the merchant.
    #[must_use]
    pub fn public_message(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::NetworkFailure(AdminShopifyError::RateLimited(secs)) => {
                format!("Shopify is rate limiting requests, retry in {secs} seconds")
            }
            Self::NetworkFailure(_) => "Could not reach Shopify".to_string(),
            _ => self.to_string(),
        }
    }

    /// JSON body for action responses.
    #[must_use]
    pub fn to_body(&self) -> ActionErrorBody {
        ActionErrorBody {
            success: false,
            kind: self.kind(),
            error: self.public_message(),
        }
    }

    /// Log server errors and capture them with Sentry.
    fn report(&self) {
        if matches!(self, Self::Database(_) | Self::NetworkFailure(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                kind = self.kind(),
                sentry_event_id = %event_id,
                "Inventory request error"
            );
        } else {
            tracing::debug!(error = %self, kind = self.kind(), "Request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.public_message()).into_response()
    }
}

/// Error wrapper for JSON endpoints: same status, JSON body.
#[derive(Debug)]
pub struct JsonError(pub AppError);

impl From<AppError> for JsonError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for JsonError {
    fn from(err: RepositoryError) -> Self {
        Self(AppError::Database(err))
    }
}

impl From<AdminShopifyError> for JsonError {
    fn from(err: AdminShopifyError) -> Self {
        Self(AppError::NetworkFailure(err))
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        self.0.report();
        (self.0.status(), Json(self.0.to_body())).into_response()
    }
}

/// Set the Sentry user context to the current shop.
pub fn set_sentry_shop(shop: &str) {
    sentry::configure_scope(|scope| {
        scope.set_tag("shop", shop);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::ValidationFailure("minimum stock must be a whole number".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: minimum stock must be a whole number"
        );

        let err = AppError::NotFoundSetting(VariantId::new_unchecked(
            "gid://shopify/ProductVariant/9",
        ));
        assert_eq!(
            err.to_string(),
            "No inventory setting for variant gid://shopify/ProductVariant/9"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFoundSetting(VariantId::new_unchecked(
                "gid://shopify/ProductVariant/1"
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::ValidationFailure("test".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::NetworkFailure(AdminShopifyError::RateLimited(2))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_database_details_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad row".to_string()));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_requires_install() {
        assert!(AppError::Unauthorized("no session".to_string()).requires_install());
        assert!(
            AppError::NetworkFailure(AdminShopifyError::Unauthorized("revoked".to_string()))
                .requires_install()
        );
        assert!(!AppError::ValidationFailure("x".to_string()).requires_install());
    }

    #[test]
    fn test_action_error_body() {
        let body = AppError::ValidationFailure("bad".to_string()).to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "kind": "validation_failure",
                "error": "Invalid input: bad"
            })
        );
    }
}
