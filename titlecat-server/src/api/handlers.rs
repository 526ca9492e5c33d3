//! HTTP request handlers
//!
//! Request parsing and response shaping only; categorization itself is a
//! titlecat-core concern. Error responses carry an `error`/`solution`
//! pair so callers can fix malformed requests without reading docs.

use crate::api::{AppContext, API_VERSION};
use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

/// Categorization request: a single title or a batch
#[derive(Debug, Deserialize)]
pub struct CategoriseRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    titles: Option<Vec<String>>,
}

/// `POST /v1/categorise`
pub async fn categorise(
    State(ctx): State<AppContext>,
    payload: Result<Json<CategoriseRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "request without a valid JSON payload");
            return bad_request(
                "Missing or invalid JSON in request",
                "Set Content-Type to application/json and provide a JSON body \
                 with a 'title' string or a 'titles' array",
            );
        }
    };

    let titles: Vec<String> = if let Some(title) = request.title {
        let title = title.trim();
        if title.is_empty() {
            Vec::new()
        } else {
            vec![title.to_string()]
        }
    } else if let Some(titles) = request.titles {
        titles
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        warn!("missing title/titles field");
        return bad_request(
            "Missing 'title' or 'titles' field",
            "Provide either a single title or an array of titles",
        );
    };

    if titles.is_empty() {
        warn!("empty titles list received");
        return bad_request(
            "No valid titles provided",
            "Provide at least one non-empty job title",
        );
    }

    let max = ctx.settings.max_titles_per_request;
    if titles.len() > max {
        warn!(count = titles.len(), "too many titles in request");
        return bad_request(
            &format!("Too many titles in one request (max {})", max),
            &format!("Split your request into batches of {} titles or less", max),
        );
    }

    let results = if titles.len() == 1 {
        vec![ctx.engine.categorize(&titles[0])]
    } else {
        ctx.engine.categorize_batch(titles).await
    };

    info!(count = results.len(), "batch processing complete");
    (
        StatusCode::OK,
        Json(json!({
            "results": results,
            "count": results.len(),
            "status": "success",
            "version": API_VERSION,
        })),
    )
}

/// `GET /health` — basic liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": API_VERSION,
        "timestamp": unix_timestamp(),
    }))
}

/// `GET /ready` — readiness including engine state
pub async fn ready(State(ctx): State<AppContext>) -> Json<Value> {
    let taxonomy = ctx.engine.current_taxonomy();
    Json(json!({
        "status": "ready",
        "checks": {
            "config_loaded": !taxonomy.functions().is_empty(),
            "cache_entries": ctx.engine.cached_results(),
            "workers": ctx.engine.config().workers,
        },
        "taxonomy_version": ctx.engine.taxonomy_version().to_string(),
        "version": API_VERSION,
    }))
}

/// `GET /` — service index
pub async fn index(State(ctx): State<AppContext>) -> Json<Value> {
    Json(json!({
        "service": "Job Title Categorization API",
        "version": API_VERSION,
        "endpoints": {
            "categorize": {
                "method": "POST",
                "path": format!("/{}/categorise", API_VERSION),
                "description": "Categorize job titles",
            },
            "health": {
                "method": "GET",
                "path": "/health",
                "description": "Basic service health check",
            },
            "ready": {
                "method": "GET",
                "path": "/ready",
                "description": "Service readiness check",
            },
            "reload": {
                "method": "POST",
                "path": "/reload-config",
                "description": "Reload the mapping file without restarting",
            },
        },
        "config": {
            "max_titles_per_request": ctx.settings.max_titles_per_request,
            "min_confidence": ctx.settings.min_confidence,
            "cache_capacity": ctx.settings.cache_capacity,
        },
    }))
}

/// `POST /reload-config` — swap in a freshly parsed taxonomy
///
/// Failure keeps the previous snapshot serving; a broken mapping file
/// never takes down a running service.
pub async fn reload_config(State(ctx): State<AppContext>) -> (StatusCode, Json<Value>) {
    let Some(path) = ctx.settings.config_path.as_deref() else {
        return bad_request(
            "No mapping file configured",
            "Start the server with --config-path to enable reloads",
        );
    };

    match crate::loader::load_taxonomy_file(path) {
        Ok(taxonomy) => {
            let version = taxonomy.version().to_string();
            ctx.engine.reload(taxonomy);
            info!("configuration reloaded successfully");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": "Configuration reloaded",
                    "config_path": path.display().to_string(),
                    "taxonomy_version": version,
                })),
            )
        }
        Err(err) => {
            error!(error = %err, "failed to reload mapping file");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": err.to_string(),
                    "version": API_VERSION,
                })),
            )
        }
    }
}

/// JSON 405 fallback for known routes hit with the wrong method
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "status": "error",
            "message": "Method not allowed",
            "version": API_VERSION,
        })),
    )
}

/// JSON 404 fallback
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Endpoint not found",
            "version": API_VERSION,
        })),
    )
}

fn bad_request(error: &str, solution: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": error,
            "solution": solution,
            "status": "error",
            "version": API_VERSION,
        })),
    )
}

fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
