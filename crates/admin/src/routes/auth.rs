//! Shopify OAuth install routes.
//!
//! `GET /auth?shop=` starts the install for a shop and `GET /auth/callback`
//! finishes it: the callback is HMAC-checked, the code is exchanged for an
//! offline token, the token is stored, and the session is bound to the shop.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use inventory_manager_core::ShopDomain;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{ShopifyToken, ShopifyTokenRepository};
use crate::middleware::set_current_shop;
use crate::models::{CurrentShop, session_keys};
use crate::routes::inventory::INVENTORY_PATH;
use crate::shopify::oauth::verify_callback_hmac;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Install page: asks for the shop domain.
#[derive(Template, WebTemplate)]
#[template(path = "auth/install.html")]
pub struct InstallTemplate {
    pub shop: String,
    pub error_message: Option<String>,
}

/// Build the OAuth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth", get(install))
        .route("/auth/callback", get(callback))
}

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct InstallParams {
    pub shop: Option<String>,
    pub error: Option<String>,
}

/// Callback parameters used after the signature check.
///
/// Read from the raw pairs, which are also what the signature covers.
#[derive(Debug, Default)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub shop: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl OAuthCallbackParams {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "shop" => &mut params.shop,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            *slot = Some(value.clone());
        }
        params
    }
}

/// Merchant-facing text for an install error code.
fn error_message(code: &str) -> String {
    match code {
        "oauth_denied" => "Installation was cancelled in Shopify.".to_string(),
        "oauth_invalid_hmac" => "Invalid security signature. Please try again.".to_string(),
        "oauth_invalid_state" => "The install link expired. Please try again.".to_string(),
        "oauth_failed" => "Installation failed. Please try again.".to_string(),
        "oauth_exchange_failed" => "Shopify did not issue an access token.".to_string(),
        "oauth_save_failed" => "Failed to save credentials.".to_string(),
        other => format!("Error: {other}"),
    }
}

fn install_error(code: &str) -> Response {
    Redirect::to(&format!("/auth?error={code}")).into_response()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /auth - Install page, or redirect to Shopify when `shop` is given.
#[instrument(skip(state, session))]
async fn install(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<InstallParams>,
) -> Response {
    let raw_shop = params.shop.unwrap_or_default();
    if raw_shop.trim().is_empty() {
        return InstallTemplate {
            shop: String::new(),
            error_message: params.error.as_deref().map(error_message),
        }
        .into_response();
    }

    let shop = match ShopDomain::parse(&raw_shop) {
        Ok(shop) => shop,
        Err(e) => {
            return InstallTemplate {
                shop: raw_shop,
                error_message: Some(e.to_string()),
            }
            .into_response();
        }
    };

    // Random state parameter for CSRF protection
    let oauth_state = uuid::Uuid::new_v4().to_string();

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!(error = %e, "Failed to store OAuth state");
        return install_error("oauth_failed");
    }
    if let Err(e) = session.insert(session_keys::OAUTH_SHOP, &shop).await {
        tracing::error!(error = %e, "Failed to store OAuth shop");
        return install_error("oauth_failed");
    }

    let auth_url = state.shopify().authorization_url(
        &shop,
        &state.config().oauth_redirect_uri(),
        &oauth_state,
    );

    tracing::info!(shop = %shop, "Redirecting to Shopify OAuth");
    Redirect::to(&auth_url).into_response()
}

/// GET /auth/callback - Handle OAuth callback.
#[instrument(skip(state, session, raw_query))]
async fn callback(
    State(state): State<AppState>,
    session: Session,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let raw_query = raw_query.unwrap_or_default();
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw_query.as_bytes())
        .into_owned()
        .collect();
    let params = OAuthCallbackParams::from_pairs(&pairs);

    // Check for errors from Shopify
    if let Some(error) = &params.error {
        let description = params.error_description.as_deref().unwrap_or_default();
        tracing::warn!(error = %error, description, "Shopify OAuth error");
        return install_error("oauth_denied");
    }

    // Verify HMAC signature from Shopify
    let secret = state.shopify().client_secret().expose_secret();
    if !verify_callback_hmac(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())), secret) {
        tracing::error!("Invalid HMAC signature in OAuth callback");
        return install_error("oauth_invalid_hmac");
    }

    let (Some(code), Some(callback_state), Some(raw_shop)) =
        (&params.code, &params.state, &params.shop)
    else {
        tracing::error!("Missing code, state or shop in callback");
        return install_error("oauth_failed");
    };

    let Ok(shop) = ShopDomain::parse(raw_shop) else {
        tracing::error!(shop = %raw_shop, "Invalid shop in callback");
        return install_error("oauth_failed");
    };

    // Verify state and shop match what we stored
    let stored_state: Option<String> = session.get(session_keys::OAUTH_STATE).await.ok().flatten();
    let stored_shop: Option<ShopDomain> = session.get(session_keys::OAUTH_SHOP).await.ok().flatten();
    if stored_state.as_ref() != Some(callback_state) || stored_shop.as_ref() != Some(&shop) {
        tracing::error!("OAuth state mismatch - possible CSRF attack");
        return install_error("oauth_invalid_state");
    }

    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;
    let _ = session.remove::<ShopDomain>(session_keys::OAUTH_SHOP).await;

    let token = match state.shopify().exchange_code(&shop, code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Failed to exchange OAuth code");
            return install_error("oauth_exchange_failed");
        }
    };

    let token = ShopifyToken::from(token);

    if let Err(e) = ShopifyTokenRepository::new(state.pool()).save(&token).await {
        tracing::error!(error = %e, "Failed to save Shopify token");
        return install_error("oauth_save_failed");
    }

    if let Err(e) = set_current_shop(&session, &CurrentShop::new(shop.clone())).await {
        tracing::error!(error = %e, "Failed to store shop session");
        return install_error("oauth_failed");
    }

    tracing::info!(shop = %shop, "Shop installed");
    Redirect::to(INVENTORY_PATH).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_params_from_pairs() {
        let pairs = vec![
            ("code".to_string(), "abc".to_string()),
            ("shop".to_string(), "pineapple.myshopify.com".to_string()),
            ("state".to_string(), "s-1".to_string()),
            ("hmac".to_string(), "ff".to_string()),
        ];
        let params = OAuthCallbackParams::from_pairs(&pairs);
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert_eq!(params.shop.as_deref(), Some("pineapple.myshopify.com"));
        assert!(params.error.is_none());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            error_message("oauth_denied"),
            "Installation was cancelled in Shopify."
        );
        assert_eq!(error_message("weird"), "Error: weird");
    }

    #[test]
    fn test_install_page_renders() {
        let html = InstallTemplate {
            shop: "pineapple".to_string(),
            error_message: Some("shop must end with .myshopify.com".to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("name=\"shop\""));
        assert!(html.contains("shop must end with .myshopify.com"));
    }
}
