// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Craft Server - apartment floor plans as JSON and 3D models.
//!
//! The server loads the apartment CSV dataset once at startup and serves
//! read-only views of it. Generated GLB models are cached on disk, keyed by
//! the dataset fingerprint.
//!
//! # Endpoints
//!
//! - `GET /` - API information
//! - `GET /api/v1/health` - Health check
//! - `GET /apartments?limit=N` - First N apartment ids
//! - `GET /apartment/:id` - Full apartment record
//! - `GET /apartment/:id/polygons` - Raw polygons for client-side extrusion
//! - `GET|HEAD /apartment/:id/glb` - Extruded, aligned GLB model
//! - `GET /apartment/:id/stats` - Element counts and room types

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{DatasetService, DiskCache};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<DatasetService>,
    pub cache: Arc<DiskCache>,
    pub config: Arc<Config>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,homecraft_server=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        dataset = %config.dataset_path,
        cache_dir = %config.cache_dir,
        "Starting Home Craft Server"
    );

    let dataset = DatasetService::load(&config.dataset_path)
        .await
        .with_context(|| format!("failed to load dataset {}", config.dataset_path))?;

    let state = AppState {
        dataset: Arc::new(dataset),
        cache: Arc::new(DiskCache::new(&config.cache_dir).await),
        config: Arc::new(config.clone()),
    };

    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
