//! Router construction and request handlers.

use crate::error::TransportError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{head, MethodRouter},
    Json, Router,
};
use linden_types::RpcResponse;
use tower_http::trace::TraceLayer;

/// Build the RPC router: one route per table entry, HEAD and POST only.
///
/// Unknown paths and non-POST/HEAD verbs both answer 404 with an empty body;
/// the convention reserves 405 for nothing.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new();

    for entry in state.table.iter() {
        tracing::debug!(url = %entry.url, kind = %entry.kind, "registering resolver route");
        let methods: MethodRouter<AppState> =
            head(warm_up).post(handle_rpc).fallback(not_found);
        router = router.route(&entry.url, methods);
    }

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Warm-up probe. Unconditional 200, empty body, never touches the resolver.
async fn warm_up() -> StatusCode {
    StatusCode::OK
}

/// 404 with empty body, for unknown paths and unsupported verbs alike.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// POST state machine: parse JSON, require `params`, invoke the resolver,
/// wrap the outcome in the response envelope.
async fn handle_rpc(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    let entry = match state.table.get(uri.path()) {
        Some(entry) => entry,
        // Routes are mounted from the table, so this only fires if the two
        // ever disagree.
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    let envelope: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return TransportError::InvalidJson.into_response(),
    };

    let params = match envelope.get("params") {
        Some(params) => params.clone(),
        None => return TransportError::MissingParams.into_response(),
    };

    if let Some(client_version) = envelope.get("version").and_then(|v| v.as_str()) {
        if client_version != state.version {
            tracing::warn!(
                client = client_version,
                server = %state.version,
                url = %entry.url,
                "client/server version mismatch"
            );
        }
    }

    match entry.resolver.resolve(params).await {
        Ok(result) => (StatusCode::OK, Json(RpcResponse::ok(result))).into_response(),
        Err(err) => {
            tracing::debug!(url = %entry.url, error = %err, "resolver returned an error");
            // Application-level failures keep HTTP 200; the populated
            // `error` field is the failure signal.
            (StatusCode::OK, Json(RpcResponse::err(err.into()))).into_response()
        }
    }
}
