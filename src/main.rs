use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::info;

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod pagination;
mod store;

use crate::config::Config;
use crate::store::ProductStore;

/// Shared application state, cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<ProductStore>>,
    pub api_key: Arc<str>,
}

impl AppState {
    /// Fresh state over the seeded collection.
    pub fn new(api_key: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(RwLock::new(ProductStore::seeded())),
            api_key: api_key.into(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,product_store_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let state = AppState::new(config.api_key.clone());
    info!(products = state.store.read().await.len(), "Product store seeded");

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Layers run outside-in: panic boundary, request log, API-key gate, CORS.
/// The gate sits outside CORS so preflights need the key too.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root).fallback(handlers::method_not_allowed))

        // ── Products ────────────────────────────────────────────────────────
        // `stats` is a static segment, so it wins over the `:id` capture.
        .route(
            "/api/products",
            get(handlers::products::list_products)
                .post(handlers::products::create_product)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/products/stats",
            get(handlers::products::product_stats).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product)
                .fallback(handlers::method_not_allowed),
        )

        // ── Search ──────────────────────────────────────────────────────────
        .route(
            "/api/search",
            get(handlers::search::search_products).fallback(handlers::method_not_allowed),
        )

        .fallback(handlers::not_found)

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(from_fn_with_state(state.clone(), middleware::require_api_key))
        .layer(from_fn(middleware::log_request))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
