#![deny(unsafe_code)]
//! Linden RPC HTTP service.
//!
//! Serves a frozen [`linden_routing::RouteTable`] over the wire contract:
//! HEAD on a resolver URL answers 200 with an empty body (warm-up probe),
//! POST runs the envelope state machine, everything else is 404.

mod config;
mod error;
mod router;
mod server;
mod state;
mod telemetry;

pub use config::{LoggingConfig, RoutingConfig, ServerConfig, ServiceConfig};
pub use error::{ServiceError, ServiceResult, TransportError};
pub use router::create_router;
pub use server::Server;
pub use state::AppState;
pub use telemetry::init_tracing;
