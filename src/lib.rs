pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod links;

use anyhow::Result;
use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::settings::Settings;
use domain::Catalog;

const API_BODY_LIMIT: usize = 64 * 1024;

// Application state
pub struct AppState {
    pub catalog: Catalog,
    pub page_size: usize,
}

/// Build the router from command-line settings, loading the catalogue file
pub fn create_router(settings: &Settings) -> Result<Router> {
    let catalog = config::catalog::load_catalog(settings.catalog_path.as_deref())?;
    tracing::info!(entries = catalog.len(), "loaded catalogue");

    Ok(app(AppState {
        catalog,
        page_size: settings.page_size,
    }))
}

/// Build the router around an already loaded catalogue
pub fn app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/catalog", get(handlers::catalog::catalog_page))
        .route(
            "/api/transform",
            post(handlers::api::transform).layer(RequestBodyLimitLayer::new(API_BODY_LIMIT)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
