use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{debug, warn};

use crate::{
    error::{AppError, AppResult},
    models::{Product, SearchQuery},
    store::QUERY_REQUIRED,
    AppState,
};

pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Query(query) = query.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected search query");
        AppError::BadRequest(QUERY_REQUIRED.to_string())
    })?;
    let results = state.store.read().await.search(query.q.as_deref())?;
    debug!(q = query.q.as_deref().unwrap_or_default(), count = results.len(), "Searched products");
    Ok(Json(results))
}
