#![deny(unsafe_code)]
//! Wire types for the Linden RPC convention.
//!
//! Every RPC exchange is a single POST carrying an [`RpcRequest`] and
//! answered with an [`RpcResponse`]. The response envelope always carries
//! both keys: exactly one of `result`/`error` is non-null.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fixed message for a POST body that does not parse as JSON.
pub const ERR_INVALID_JSON: &str = "Request body is not valid JSON";

/// Fixed message for a JSON body with no `params` key.
pub const ERR_MISSING_PARAMS: &str = "Request body is missing the 'params' key";

/// What a resolver does: read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    Query,
    Mutation,
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverKind::Query => write!(f, "query"),
            ResolverKind::Mutation => write!(f, "mutation"),
        }
    }
}

/// Request envelope: `{"params": <json>, "version"?: <string>}`.
///
/// `params` is forwarded verbatim as the resolver's sole argument. `version`
/// is the caller's build version, reported for advisory skew detection only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcRequest {
    pub params: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl RpcRequest {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Serialized resolver failure: a required `message` plus any additional
/// fields the resolver attached.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub message: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl RpcError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Response envelope: `{"result": <json>|null, "error": {...}|null}`.
///
/// Both keys are always serialized. Construct through [`RpcResponse::ok`] or
/// [`RpcResponse::err`] so exactly one side is populated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: RpcError) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Error type resolvers return from [`Resolver::resolve`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ResolverError {
    pub message: String,
    /// Additional structured fields serialized alongside `message`.
    pub details: BTreeMap<String, Value>,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

impl From<ResolverError> for RpcError {
    fn from(err: ResolverError) -> Self {
        RpcError {
            message: err.message,
            details: err.details,
        }
    }
}

/// A named server-side function reachable over the RPC convention.
///
/// Registered once at route-table construction time and immutable for the
/// life of the deployed server. `params` arrives verbatim from the request
/// envelope.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, params: Value) -> Result<Value, ResolverError>;

    fn kind(&self) -> ResolverKind;
}

/// Adapter turning an async closure into a [`Resolver`].
pub struct FnResolver<F> {
    kind: ResolverKind,
    func: F,
}

impl<F, Fut> FnResolver<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Value, ResolverError>> + Send,
{
    pub fn query(func: F) -> Self {
        Self {
            kind: ResolverKind::Query,
            func,
        }
    }

    pub fn mutation(func: F) -> Self {
        Self {
            kind: ResolverKind::Mutation,
            func,
        }
    }
}

#[async_trait]
impl<F, Fut> Resolver for FnResolver<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Value, ResolverError>> + Send,
{
    async fn resolve(&self, params: Value) -> Result<Value, ResolverError> {
        (self.func)(params).await
    }

    fn kind(&self) -> ResolverKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_carries_both_keys() {
        let resp = RpcResponse::ok(json!({"name": "x"}));
        let wire = serde_json::to_value(&resp).unwrap();
        assert_eq!(wire, json!({"result": {"name": "x"}, "error": null}));
    }

    #[test]
    fn error_envelope_nulls_result() {
        let resp = RpcResponse::err(RpcError::new("boom"));
        let wire = serde_json::to_value(&resp).unwrap();
        assert_eq!(wire, json!({"result": null, "error": {"message": "boom"}}));
    }

    #[test]
    fn error_details_are_flattened() {
        let err = RpcError::new("not found").with_detail("code", json!("E_NOT_FOUND"));
        let wire = serde_json::to_value(&err).unwrap();
        assert_eq!(wire, json!({"message": "not found", "code": "E_NOT_FOUND"}));
    }

    #[test]
    fn request_omits_absent_version() {
        let req = RpcRequest::new(json!({"id": 1}));
        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(wire, json!({"params": {"id": 1}}));

        let req = req.with_version("1.2.3");
        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(wire, json!({"params": {"id": 1}, "version": "1.2.3"}));
    }

    #[test]
    fn resolver_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ResolverKind::Query).unwrap(),
            json!("query")
        );
        assert_eq!(
            serde_json::to_value(ResolverKind::Mutation).unwrap(),
            json!("mutation")
        );
    }

    #[tokio::test]
    async fn fn_resolver_forwards_params() {
        let resolver = FnResolver::query(|params: Value| async move {
            Ok(json!({"echo": params}))
        });
        let out = resolver.resolve(json!([1, 2])).await.unwrap();
        assert_eq!(out, json!({"echo": [1, 2]}));
        assert_eq!(resolver.kind(), ResolverKind::Query);
    }

    #[tokio::test]
    async fn resolver_error_converts_to_rpc_error() {
        let resolver = FnResolver::mutation(|_params: Value| async move {
            Err::<Value, _>(ResolverError::new("denied").with_detail("code", json!(42)))
        });
        let err: RpcError = resolver.resolve(json!(null)).await.unwrap_err().into();
        assert_eq!(err.message, "denied");
        assert_eq!(err.details["code"], json!(42));
    }
}
