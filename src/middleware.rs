use std::any::Any;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::{
    error::{error_body, AppError, GENERIC_ERROR},
    AppState,
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Logs method, path and timestamp before the request is handled, then the
/// outcome once a response exists.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    info!(%method, %path, %timestamp, "Request received");

    let start = Instant::now();
    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Request completed"
    );

    response
}

/// Rejects any request whose `x-api-key` header does not match the shared
/// secret. Runs before routing, so unknown paths are gated as well.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match presented {
        Some(key) if key == &*state.api_key => Ok(next.run(request).await),
        Some(_) => {
            warn!(path = %request.uri().path(), "Rejected request with wrong API key");
            Err(AppError::Unauthorized)
        }
        None => {
            warn!(path = %request.uri().path(), "Rejected request without API key");
            Err(AppError::Unauthorized)
        }
    }
}

/// Panic handler for `CatchPanicLayer`: log the payload, answer with a
/// generic 500.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, error_body(GENERIC_ERROR)).into_response()
}
