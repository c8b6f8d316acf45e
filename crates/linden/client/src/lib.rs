#![deny(unsafe_code)]
//! HTTP client for Linden RPC servers.
//!
//! Callers issue an optional [`RpcClient::warm_up`] probe as early as
//! possible (typically on page/process start) and then [`RpcClient::query`]
//! or [`RpcClient::mutate`]. The probe and the call are independent; they
//! may race and the call works without the probe.

use linden_types::{RpcError, RpcRequest, RpcResponse};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// Client-side errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request envelope (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No resolver at this URL (404)
    #[error("No resolver at this URL")]
    NotFound,

    /// The resolver itself failed
    #[error("Resolver error: {0}")]
    Resolver(RpcError),

    /// Response body did not decode as an RPC envelope
    #[error("Malformed response envelope: {0}")]
    Decode(#[from] serde_json::Error),

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for a Linden RPC server.
pub struct RpcClient {
    client: Client,
    base_url: String,
    version: Option<String>,
}

impl RpcClient {
    /// Create a new client for `endpoint` (scheme + authority, no path).
    pub fn new(endpoint: &str) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
            version: None,
        })
    }

    /// Attach this build's version to every request, for advisory skew
    /// detection on the server.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Issue the warm-up probe for a resolver URL. Fire-and-forget at call
    /// sites; a failed probe never affects the subsequent call.
    pub async fn warm_up(&self, url: &str) -> ClientResult<()> {
        let response = self
            .client
            .head(format!("{}{}", self.base_url, url))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Unexpected {
                status: response.status().as_u16(),
                message: "warm-up probe rejected".to_string(),
            })
        }
    }

    /// Invoke a query resolver.
    pub async fn query(&self, url: &str, params: Value) -> ClientResult<Value> {
        self.call(url, params).await
    }

    /// Invoke a mutation resolver.
    pub async fn mutate(&self, url: &str, params: Value) -> ClientResult<Value> {
        self.call(url, params).await
    }

    async fn call(&self, url: &str, params: Value) -> ClientResult<Value> {
        let mut request = RpcRequest::new(params);
        if let Some(version) = &self.version {
            request = request.with_version(version.clone());
        }

        let response = self
            .client
            .post(format!("{}{}", self.base_url, url))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }

        let bytes = response.bytes().await?;
        let envelope: RpcResponse = serde_json::from_slice(&bytes)?;

        match (status, envelope.result, envelope.error) {
            (StatusCode::BAD_REQUEST, _, Some(error)) => {
                Err(ClientError::BadRequest(error.message))
            }
            (_, _, Some(error)) => {
                tracing::debug!(message = %error.message, "resolver returned an error");
                Err(ClientError::Resolver(error))
            }
            // A resolver returning JSON null decodes as a missing result.
            (StatusCode::OK, result, None) => Ok(result.unwrap_or(Value::Null)),
            (status, _, _) => Err(ClientError::Unexpected {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}
