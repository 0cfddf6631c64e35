/// fakescope detection server
///
/// Accepts image uploads on `POST /detect`, answers with a verdict and a
/// heatmap handle, and serves the heatmap once on `GET /heatmap/{handle}`.
/// Served by a synchronous tiny_http server.
///
/// Run with:
///   cargo run --bin fakescope-server --release
mod args;
mod handlers;
mod routes;
mod state;
mod util;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tiny_http::Server;
use tracing::{info, info_span};

use state::SharedService;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = args::Args::parse().into_config();
    let service: SharedService = Arc::new(config.build_service(info_span!("analysis"))?);

    let server = Server::http(config.bind.as_str())
        .map_err(|e| anyhow!("failed to bind {}: {}", config.bind, e))?;

    info!(bind = %config.bind, store = ?config.store, "fakescope server listening");

    // One thread per request; the engine is pure and each request owns its
    // own stored artifact.
    for request in server.incoming_requests() {
        let service = service.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, service);
        });
    }
    Ok(())
}
