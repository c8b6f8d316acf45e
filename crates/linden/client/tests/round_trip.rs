//! Client round-trips against a live service router.

use linden_client::{ClientError, RpcClient};
use linden_routing::{PathStrategy, RouteTable};
use linden_service::{create_router, AppState};
use linden_types::{FnResolver, ResolverError};
use serde_json::{json, Value};
use std::sync::Arc;

/// Serve the real RPC router on an ephemeral port; returns the endpoint.
async fn spawn_server() -> String {
    let table = RouteTable::builder(PathStrategy::default())
        .register(
            "app/users/queries/getUser.ts",
            Arc::new(FnResolver::query(|params: Value| async move {
                Ok(json!({"id": params["id"], "name": "x"}))
            })),
        )
        .register(
            "app/users/queries/getNothing.ts",
            Arc::new(FnResolver::query(|_params: Value| async move {
                Ok(Value::Null)
            })),
        )
        .register(
            "app/users/mutations/deleteUser.ts",
            Arc::new(FnResolver::mutation(|_params: Value| async move {
                Err::<Value, _>(
                    ResolverError::new("user is protected")
                        .with_detail("code", json!("E_PROTECTED")),
                )
            })),
        )
        .build()
        .unwrap();

    let app = create_router(AppState::new(Arc::new(table)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Stand-in for a front-end that rejects the envelope before the resolver,
/// exercising the client's 400 mapping.
async fn spawn_rejecting_server() -> String {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use linden_types::{RpcError, RpcResponse, ERR_INVALID_JSON};

    let app = Router::new().route(
        "/api/rpc/getUser",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(RpcResponse::err(RpcError::new(ERR_INVALID_JSON))),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn warm_up_probe_succeeds_on_resolver_urls() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    client.warm_up("/api/rpc/getUser").await.unwrap();
}

#[tokio::test]
async fn warm_up_probe_reports_unknown_urls() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    let err = client.warm_up("/api/rpc/unknown").await.unwrap_err();
    match err {
        ClientError::Unexpected { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Unexpected, got {other}"),
    }
}

#[tokio::test]
async fn query_round_trip_returns_the_result() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    let result = client
        .query("/api/rpc/getUser", json!({"id": 1}))
        .await
        .unwrap();
    assert_eq!(result, json!({"id": 1, "name": "x"}));
}

#[tokio::test]
async fn null_result_round_trips() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    let result = client
        .query("/api/rpc/getNothing", json!({}))
        .await
        .unwrap();
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn resolver_failure_maps_to_resolver_error() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    let err = client
        .mutate("/api/rpc/deleteUser", json!({"id": 7}))
        .await
        .unwrap_err();
    match err {
        ClientError::Resolver(error) => {
            assert_eq!(error.message, "user is protected");
            assert_eq!(error.details["code"], json!("E_PROTECTED"));
        }
        other => panic!("expected Resolver, got {other}"),
    }
}

#[tokio::test]
async fn unknown_url_maps_to_not_found() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    let err = client
        .query("/api/rpc/unknown", json!(null))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
}

#[tokio::test]
async fn envelope_rejection_maps_to_bad_request() {
    let endpoint = spawn_rejecting_server().await;
    let client = RpcClient::new(&endpoint).unwrap();

    let err = client
        .query("/api/rpc/getUser", json!({"id": 1}))
        .await
        .unwrap_err();
    match err {
        ClientError::BadRequest(message) => {
            assert_eq!(message, "Request body is not valid JSON");
        }
        other => panic!("expected BadRequest, got {other}"),
    }
}

#[tokio::test]
async fn version_reporting_does_not_affect_the_call() {
    let endpoint = spawn_server().await;
    let client = RpcClient::new(&endpoint)
        .unwrap()
        .with_version("0.0.0-stale");

    let result = client
        .query("/api/rpc/getUser", json!({"id": 2}))
        .await
        .unwrap();
    assert_eq!(result["id"], json!(2));
}
