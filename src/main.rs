// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fit-Journal API Server
//!
//! Serves the daily journal: metrics, workouts, events, weekly summaries
//! and backups.

use fit_journal::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, JournalDb},
    theme::ThemeState,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Fit-Journal API");

    let db = match config.store_backend {
        StoreBackend::Firestore => {
            JournalDb::Firestore(FirestoreDb::new(&config.gcp_project_id).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            JournalDb::in_memory()
        }
    };
    tracing::info!(backend = db.backend_name(), "Store initialized");

    let theme = ThemeState::initialize(config.theme_path.clone(), config.system_theme).await;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        theme,
    });

    // Build router
    let app = fit_journal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fit_journal=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
