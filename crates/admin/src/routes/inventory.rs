//! Inventory page route handlers.
//!
//! - `GET /app/inventory` renders the table, summary cards and settings modal
//! - `GET /app/inventory/data` returns the loader output as JSON
//! - `POST /app/inventory` updates one variant's low-stock threshold

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use inventory_manager_core::{
    InventorySummary, MinStock, Selection, ShopDomain, SortColumn, SortDirection, SortState,
    VariantId, VariantRow, flatten_variants,
};
use serde::Serialize;
use tracing::instrument;

use crate::db::{InventorySettingRepository, ShopifyToken, ShopifyTokenRepository};
use crate::error::{AppError, JsonError};
use crate::middleware::{INSTALL_PATH, RequireShop};
use crate::services::{
    LoaderData, ShopCatalog, ThresholdForm, ThresholdUpdate, load_inventory, update_threshold,
};
use crate::state::AppState;

/// Path of the inventory page.
pub const INVENTORY_PATH: &str = "/app/inventory";

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(INVENTORY_PATH, get(page).post(action))
        .route("/app/inventory/data", get(data))
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Page query string: sort state, selected rows and the open modal.
///
/// Parsed by hand because `selected` repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub selected: Vec<String>,
    pub variant: Option<String>,
}

impl PageQuery {
    /// Parse a raw query string, ignoring unknown and empty parameters.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "sort" => query.sort = Some(value.to_owned()),
                "direction" => query.direction = Some(value.to_owned()),
                "selected" => query.selected.push(value.to_owned()),
                "variant" => query.variant = Some(value.to_owned()),
                _ => {}
            }
        }
        query
    }

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        SortState::from_params(self.sort.as_deref(), self.direction.as_deref())
    }

    /// Direction to carry in links, if any.
    ///
    /// Present whenever a column is active or the direction is not the
    /// default.
    fn direction_param(sort: SortState) -> Option<&'static str> {
        (sort.column.is_some() || sort.direction != SortDirection::default())
            .then_some(sort.direction.as_param())
    }

    /// Page URL for a sort state, selection and modal.
    fn href<'a, I>(sort: SortState, selected: I, variant: Option<&VariantId>) -> String
    where
        I: IntoIterator<Item = &'a VariantId>,
    {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(column) = sort.column {
            query.append_pair("sort", column.as_param());
        }
        if let Some(direction) = Self::direction_param(sort) {
            query.append_pair("direction", direction);
        }
        for id in selected {
            query.append_pair("selected", id.as_str());
        }
        if let Some(variant) = variant {
            query.append_pair("variant", variant.as_str());
        }

        let query = query.finish();
        if query.is_empty() {
            INVENTORY_PATH.to_string()
        } else {
            format!("{INVENTORY_PATH}?{query}")
        }
    }
}

// =============================================================================
// View Models
// =============================================================================

/// A sortable column heading.
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub label: &'static str,
    pub aria_sort: &'static str,
    pub href: String,
    pub numeric: bool,
}

/// One table row.
#[derive(Debug, Clone)]
pub struct RowView {
    pub id: String,
    pub title: String,
    pub product_title: String,
    pub status: String,
    pub status_tone: &'static str,
    pub quantity: i64,
    pub quantity_tone: &'static str,
    pub quantity_emphasis: &'static str,
    pub threshold: String,
    pub selected: bool,
    pub settings_href: String,
}

/// The open settings modal.
#[derive(Debug, Clone)]
pub struct ModalView {
    pub variant_id: String,
    pub variant_title: String,
    pub product_title: String,
    pub min_stock: i32,
    pub close_href: String,
}

/// Inventory page template.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/index.html")]
pub struct InventoryIndexTemplate {
    pub shop: String,
    pub summary: InventorySummary,
    pub default_min_stock: i32,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub selection_label: String,
    pub all_selected: bool,
    pub select_all_href: String,
    pub clear_selection_href: String,
    pub sort_param: String,
    pub direction_param: String,
    pub modal: Option<ModalView>,
}

impl InventoryIndexTemplate {
    /// Compose the page from loader output and the query string.
    #[must_use]
    pub fn build(
        shop: &ShopDomain,
        data: &LoaderData,
        query: &PageQuery,
        default_min_stock: MinStock,
    ) -> Self {
        let mut variants = flatten_variants(&data.products, &data.settings);
        let sort = query.sort_state();
        sort.apply(&mut variants);

        let summary = InventorySummary::from_rows(&variants, default_min_stock);
        let selection = Selection::from_requested(&query.selected, &variants);

        let headers = SortColumn::ALL
            .iter()
            .map(|&column| HeaderView {
                label: column.label(),
                aria_sort: sort.aria_sort(column),
                href: PageQuery::href(sort.toggle(column), selection.ids(), None),
                numeric: column == SortColumn::InventoryQuantity,
            })
            .collect();

        let modal = query
            .variant
            .as_deref()
            .and_then(|id| variants.iter().find(|row| row.id.as_str() == id))
            .map(|row| ModalView {
                variant_id: row.id.to_string(),
                variant_title: row.title.clone(),
                product_title: row.product_title.clone(),
                min_stock: row.modal_seed(),
                close_href: PageQuery::href(sort, selection.ids(), None),
            });

        let rows = variants
            .iter()
            .map(|row| row_view(row, &selection, sort, default_min_stock))
            .collect();

        Self {
            shop: shop.to_string(),
            summary,
            default_min_stock: default_min_stock.get(),
            headers,
            rows,
            selection_label: selection.label(),
            all_selected: selection.all_selected(),
            select_all_href: PageQuery::href(sort, variants.iter().map(|row| &row.id), None),
            clear_selection_href: PageQuery::href(sort, [], None),
            sort_param: sort.column.map_or("", SortColumn::as_param).to_string(),
            direction_param: PageQuery::direction_param(sort)
                .unwrap_or_default()
                .to_string(),
            modal,
        }
    }
}

fn row_view(
    row: &VariantRow,
    selection: &Selection,
    sort: SortState,
    default_min_stock: MinStock,
) -> RowView {
    RowView {
        id: row.id.to_string(),
        title: row.title.clone(),
        product_title: row.product_title.clone(),
        status: row.product_status.to_string(),
        status_tone: row.status_tone().as_str(),
        quantity: row.inventory_quantity,
        quantity_tone: row.quantity_tone(default_min_stock).as_str(),
        quantity_emphasis: row.quantity_emphasis(default_min_stock).as_str(),
        threshold: row
            .min_stock_threshold
            .map_or_else(|| format!("{default_min_stock} (default)"), |t| t.to_string()),
        selected: selection.is_selected(&row.id),
        settings_href: PageQuery::href(sort, selection.ids(), Some(&row.id)),
    }
}

/// Body of a successful action.
#[derive(Debug, Serialize)]
pub struct ActionSuccess {
    pub success: bool,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Load the shop's stored token, or report that the shop must reinstall.
async fn shop_token(state: &AppState, shop: &ShopDomain) -> Result<ShopifyToken, AppError> {
    ShopifyTokenRepository::new(state.pool())
        .get_by_shop(shop)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("no access token for {shop}")))
}

/// Run the loader for the current shop.
async fn run_loader(state: &AppState, shop: &ShopDomain) -> Result<LoaderData, AppError> {
    let token = shop_token(state, shop).await?;
    let catalog = ShopCatalog::new(state.shopify(), &token);
    let settings = InventorySettingRepository::new(state.pool());
    load_inventory(&catalog, &settings, shop, state.default_min_stock()).await
}

/// Install URL for a shop whose token is missing or rejected.
fn reinstall_href(shop: &ShopDomain) -> String {
    format!("{INSTALL_PATH}?shop={}", urlencoding::encode(shop.as_str()))
}

/// GET /app/inventory - Inventory page.
#[instrument(skip(state, current, raw_query), fields(shop = %current.shop))]
async fn page(
    State(state): State<AppState>,
    RequireShop(current): RequireShop,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let query = PageQuery::parse(raw_query.as_deref());

    match run_loader(&state, &current.shop).await {
        Ok(data) => InventoryIndexTemplate::build(
            &current.shop,
            &data,
            &query,
            state.default_min_stock(),
        )
        .into_response(),
        Err(e) if e.requires_install() => {
            tracing::warn!(error = %e, "Shop needs to reinstall");
            // Shopify rejected the stored token
            if matches!(e, AppError::NetworkFailure(_))
                && let Err(err) = ShopifyTokenRepository::new(state.pool())
                    .delete(&current.shop)
                    .await
            {
                tracing::error!(error = %err, "Failed to delete rejected token");
            }
            Redirect::to(&reinstall_href(&current.shop)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /app/inventory/data - Loader output as JSON.
#[instrument(skip(state, current), fields(shop = %current.shop))]
async fn data(
    State(state): State<AppState>,
    RequireShop(current): RequireShop,
) -> Result<Json<LoaderData>, JsonError> {
    Ok(Json(run_loader(&state, &current.shop).await?))
}

/// POST /app/inventory - Update one variant's threshold.
#[instrument(skip(state, current, form), fields(shop = %current.shop))]
async fn action(
    State(state): State<AppState>,
    RequireShop(current): RequireShop,
    Form(form): Form<ThresholdForm>,
) -> Result<Json<ActionSuccess>, JsonError> {
    let update = ThresholdUpdate::parse(&form)?;
    let settings = InventorySettingRepository::new(state.pool());
    update_threshold(&settings, &current.shop, &update).await?;

    Ok(Json(ActionSuccess { success: true }))
}
