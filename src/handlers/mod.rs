pub mod products;
pub mod search;

use axum::{http::StatusCode, Json};

use crate::error::error_body;

pub const WELCOME: &str = "Welcome to the Product API! Go to /api/products to see all products.";

pub async fn root() -> &'static str {
    WELCOME
}

pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, error_body("Route not found"))
}

/// Known path, unsupported method.
pub async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::METHOD_NOT_ALLOWED, error_body("Method not allowed"))
}
