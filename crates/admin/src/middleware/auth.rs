//! Authentication extractors for shop sessions.
//!
//! Provides extractors for requiring an installed shop in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{Method, StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentShop, session_keys};

/// Extractor that requires an installed shop in the session.
///
/// If there is none, page requests are redirected to the install page and
/// JSON requests get 401 Unauthorized with an error body.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireShop(current): RequireShop) -> impl IntoResponse {
///     format!("Hello, {}!", current.shop)
/// }
/// ```
pub struct RequireShop(pub CurrentShop);

/// Error returned when a shop session is required but missing.
#[derive(Debug)]
pub enum ShopAuthRejection {
    /// Redirect to the install page (for HTML requests).
    RedirectToInstall,
    /// Unauthorized response (for JSON requests).
    Unauthorized,
}

impl IntoResponse for ShopAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToInstall => Redirect::to(INSTALL_PATH).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(AppError::Unauthorized("no shop session".to_string()).to_body()),
            )
                .into_response(),
        }
    }
}

/// Where merchants without a session are sent.
pub const INSTALL_PATH: &str = "/auth";

/// Whether the caller expects JSON rather than a page.
///
/// Form posts from the modal script, the data endpoint, and anything that
/// asks for `application/json` count as JSON requests.
#[must_use]
pub fn wants_json(parts: &Parts) -> bool {
    if parts.method != Method::GET && parts.method != Method::HEAD {
        return true;
    }
    if parts.uri.path().ends_with("/data") {
        return true;
    }
    parts
        .headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

impl<S> FromRequestParts<S> for RequireShop
where
    S: Send + Sync,
{
    type Rejection = ShopAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let rejection = if wants_json(parts) {
            ShopAuthRejection::Unauthorized
        } else {
            ShopAuthRejection::RedirectToInstall
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(rejection);
        };

        let current: CurrentShop = session
            .get(session_keys::CURRENT_SHOP)
            .await
            .ok()
            .flatten()
            .ok_or(rejection)?;

        crate::error::set_sentry_shop(current.shop.as_str());
        Ok(Self(current))
    }
}

/// Helper to set the current shop in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_shop(
    session: &Session,
    current: &CurrentShop,
) -> Result<(), tower_sessions::session::Error> {
    // New identity, new session id
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_SHOP, current).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(method: Method, uri: &str, accept: Option<&str>) -> Parts {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(accept) = accept {
            builder = builder.header(header::ACCEPT, accept);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_wants_json() {
        assert!(!wants_json(&parts(Method::GET, "/app/inventory", None)));
        assert!(!wants_json(&parts(
            Method::GET,
            "/app/inventory",
            Some("text/html,application/xhtml+xml")
        )));
        assert!(wants_json(&parts(Method::POST, "/app/inventory", None)));
        assert!(wants_json(&parts(Method::GET, "/app/inventory/data", None)));
        assert!(wants_json(&parts(
            Method::GET,
            "/app/inventory",
            Some("application/json")
        )));
    }

    #[test]
    fn test_rejection_responses() {
        let redirect = ShopAuthRejection::RedirectToInstall.into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(redirect.headers().get(header::LOCATION).unwrap(), "/auth");

        let unauthorized = ShopAuthRejection::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
