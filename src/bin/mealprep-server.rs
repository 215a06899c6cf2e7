// ABOUTME: Server binary for the MealPrepAI recipe delivery service
// ABOUTME: Loads configuration, wires the generation client and mailer, and serves the HTTP API
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # `MealPrep` Server Binary
//!
//! Starts the HTTP API that accepts meal requests and emails the generated
//! recipe back to the user.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mealprep_server::{
    config::ServerConfig, logging, resources::ServerResources, routes,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mealprep-server")]
#[command(about = "MealPrepAI - LLM-generated recipes delivered by email")]
pub struct Args {
    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the seed recipe catalog path
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log emails instead of sending them, even with SMTP credentials set
    #[arg(long)]
    dry_run_mail: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    if args.dry_run_mail {
        config.mail.force_dry_run = true;
    }
    config.validate()?;

    info!("{}", config.summary());
    if config.mail.is_dry_run() {
        warn!("SMTP credentials not configured; emails will be logged, not sent");
    }

    let config = Arc::new(config);
    let resources = Arc::new(
        ServerResources::from_config(Arc::clone(&config))
            .context("Failed to initialize server resources")?,
    );
    let app = routes::router(resources);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{address}");
    display_available_endpoints(&address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}

/// Log the available API endpoints
fn display_available_endpoints(address: &str) {
    info!("=== Available API Endpoints ===");
    info!("  Meal plan:        POST http://{address}/api/meal-plan");
    info!("  Meal plan (form): POST http://{address}/generate");
    info!("  Suggestions:      POST http://{address}/suggest");
    info!("  Recipe detail:    POST http://{address}/recipe");
    info!("  Grocery list:     POST http://{address}/email");
    info!("  Coach steps:      POST http://{address}/ai/instructions");
    info!("  Coach chat:       POST http://{address}/ai/chat");
    info!("  Health:           GET  http://{address}/health");
    info!("  Readiness:        GET  http://{address}/ready");
    info!("=== End of Endpoint List ===");
}
