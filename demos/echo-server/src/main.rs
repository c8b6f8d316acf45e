//! Demo Linden RPC server.
//!
//! Registers two resolvers under convention paths and serves them:
//! - query  `demo/queries/echo`    -> `/api/rpc/echo`
//! - mutation `demo/mutations/increment` -> `/api/rpc/increment`

use clap::Parser;
use linden_routing::RouteTable;
use linden_service::{init_tracing, Server, ServiceConfig};
use linden_types::{FnResolver, ResolverError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Linden echo server CLI
#[derive(Parser)]
#[command(name = "linden-echo")]
#[command(about = "Demo Linden RPC server", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LINDEN_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(
        short,
        long,
        env = "LINDEN_LISTEN_ADDR",
        default_value = "127.0.0.1:8080"
    )]
    listen: String,

    /// Log level
    #[arg(long, env = "LINDEN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "LINDEN_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    config.server.listen_addr = cli.listen.parse()?;
    config.logging.level = cli.log_level.clone();
    config.logging.json = cli.json;

    init_tracing(&config.logging);

    let counter = Arc::new(AtomicI64::new(0));

    let table = RouteTable::builder(config.routing.path_strategy()?)
        .register(
            "demo/queries/echo.rs",
            Arc::new(FnResolver::query(|params: Value| async move {
                Ok(json!({"echo": params}))
            })),
        )
        .register(
            "demo/mutations/increment.rs",
            Arc::new(FnResolver::mutation(move |params: Value| {
                let counter = counter.clone();
                async move {
                    let step = params.get("by").and_then(Value::as_i64).unwrap_or(1);
                    if step == 0 {
                        return Err(ResolverError::new("step must be non-zero")
                            .with_detail("by", params["by"].clone()));
                    }
                    let value = counter.fetch_add(step, Ordering::SeqCst) + step;
                    Ok(json!({"value": value}))
                }
            })),
        )
        .build()?;

    println!(
        r#"
  _     _           _
 | |   (_)_ __   __| | ___ _ __
 | |   | | '_ \ / _` |/ _ \ '_ \
 | |___| | | | | (_| |  __/ | | |
 |_____|_|_| |_|\__,_|\___|_| |_|

  Linden RPC - demo echo server
  Version: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr
    );

    tracing::info!("registered {} resolvers", table.len());

    Server::new(config, table).run().await?;
    Ok(())
}
