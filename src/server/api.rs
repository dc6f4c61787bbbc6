use crate::relay::{ RelayError, RelayHandler };
use axum::{
    body::Bytes,
    extract::State,
    http::{ header, HeaderValue, Method, StatusCode },
    response::{ IntoResponse, Response },
    Json,
    Router,
};
use log::{ error, info, warn };
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    relay: Arc<RelayHandler>,
}

/// Every path and method lands on the relay entry point; the relay is
/// deployed as a single endpoint and browsers may hit it under any path.
pub fn router(relay: Arc<RelayHandler>) -> Router {
    Router::new()
        .fallback(relay_entry)
        .layer(
            SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*")
            )
        )
        .with_state(AppState { relay })
}

async fn relay_entry(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return preflight();
    }

    let request_id = Uuid::new_v4();
    if method != Method::POST {
        warn!("[{}] Rejected {} request", request_id, method);
        return RelayError::MethodNotAllowed.into_response();
    }

    info!("[{}] Relay request ({} bytes)", request_id, body.len());
    match state.relay.relay(&body).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            if e.is_client_error() {
                warn!("[{}] Bad request: {}", request_id, e);
            } else {
                error!("[{}] Relay failed with {}: {}", request_id, e.status(), e);
            }
            e.into_response()
        }
    }
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    ).into_response()
}
