//! HTTP server wiring

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{self, fields, AppState};
use crate::gate::RouteGate;
use crate::ContentGate;

/// Load content, validate the configured field sets, and serve the API
pub async fn start(app: &ContentGate, ip: &str, port: u16) -> Result<()> {
    let store = app.load_store()?;
    fields::validate(&app.config.fields, &store)?;

    let state = Arc::new(AppState {
        gate: RouteGate::from_config(&app.config.gate)?,
        repo: Arc::new(store),
        config: app.config.clone(),
    });
    let router = api::router(state);

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "API running at http://{}:{}{}",
        ip, port, app.config.namespace
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
