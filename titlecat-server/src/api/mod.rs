//! HTTP API surface
//!
//! Router and shared application context. Handlers live in
//! [`handlers`]; everything is JSON in and JSON out, including 404s.

pub mod handlers;

use crate::settings::Settings;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use titlecat_core::Engine;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// API version segment used in routes and response bodies
pub const API_VERSION: &str = "v1";

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub engine: Engine,
    pub settings: Arc<Settings>,
}

/// Build the application router
pub fn router(ctx: AppContext) -> Router {
    // Per-route fallbacks turn axum's empty-body 405s into JSON errors
    Router::new()
        .route(
            "/v1/categorise",
            post(handlers::categorise).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/ready",
            get(handlers::ready).fallback(handlers::method_not_allowed),
        )
        .route(
            "/",
            get(handlers::index).fallback(handlers::method_not_allowed),
        )
        .route(
            "/reload-config",
            post(handlers::reload_config).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
