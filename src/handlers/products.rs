use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductFilters, ProductPayload, INVALID_PRODUCT},
    pagination::Pagination,
    store::PRODUCT_NOT_FOUND,
    AppState,
};

/// Unwraps the JSON extractor; a malformed or mistyped body is a plain 400.
fn read_payload(payload: Result<Json<ProductPayload>, JsonRejection>) -> AppResult<ProductPayload> {
    payload.map(|Json(p)| p).map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected product body");
        AppError::BadRequest(INVALID_PRODUCT.to_string())
    })
}

// ── List ──────────────────────────────────────────────────────────────────────

/// Listing never fails: an unparseable query string means no filters.
pub async fn list_products(
    State(state): State<AppState>,
    filters: Result<Query<ProductFilters>, QueryRejection>,
) -> Json<Vec<Product>> {
    let filters = filters.map(|Query(f)| f).unwrap_or_else(|rejection| {
        warn!(reason = %rejection.body_text(), "Ignoring unparseable list query");
        ProductFilters::default()
    });
    let page = Pagination::parse(filters.page.as_deref(), filters.limit.as_deref());
    let products = state
        .store
        .read()
        .await
        .list(filters.category.as_deref(), page);

    debug!(
        category = filters.category.as_deref().unwrap_or("*"),
        page = page.page,
        limit = page.limit,
        count = products.len(),
        "Listed products"
    );

    Json(products)
}

// ── Stats ─────────────────────────────────────────────────────────────────────

pub async fn product_stats(State(state): State<AppState>) -> Json<IndexMap<String, usize>> {
    let stats = state.store.read().await.stats();
    debug!(categories = stats.len(), "Computed product stats");
    Json(stats)
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let new = read_payload(payload)?.validate()?;
    let product = state.store.write().await.create(new);

    info!(id = %product.id, name = %product.name, "Created product");

    Ok((StatusCode::CREATED, Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state.store.read().await.get(&id)?;
    debug!(id = %id, "Fetched product");
    Ok(Json(product))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let mut store = state.store.write().await;

    // Unknown id wins over a bad body.
    if !store.contains(&id) {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()));
    }
    let new = read_payload(payload)?.validate()?;
    let product = store.replace(&id, new)?;
    drop(store);

    info!(id = %id, "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let removed = state.store.write().await.delete(&id)?;
    info!(id = %id, name = %removed.name, "Deleted product");
    Ok(StatusCode::NO_CONTENT)
}
