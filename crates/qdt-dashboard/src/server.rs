//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    extract::OriginalUri,
    http::{HeaderValue, Method, StatusCode, header},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::state::AppState;

// Embed static files at compile time
const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");
const STYLE_CSS: &str = include_str!("../static/style.css");

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/backend/health", get(api::health::backend_health))
        .route(
            "/twins",
            get(api::twins::list_twins).post(api::twins::create_twin),
        )
        .route("/twins/{twin_id}", get(api::twins::get_twin))
        .route(
            "/state/{twin_id}",
            get(api::state::get_state).post(api::state::set_state),
        )
        .route("/execute", post(api::execute::execute_job))
        .route("/route", post(api::execute::preview_route))
        .fallback(api_not_found);

    // Static file routes
    let static_routes = Router::new()
        .route("/", get(serve_index))
        .route("/index.html", get(serve_index))
        .route("/app.js", get(serve_app_js))
        .route("/style.css", get(serve_style_css));

    let cors = build_cors_layer(&state.config.cors_origins);

    Router::new()
        .nest("/api", api_routes)
        .merge(static_routes)
        .fallback(serve_index) // SPA fallback
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `*` allows any origin; otherwise a comma-separated allow-list.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::CACHE_CONTROL]);

    if origins.trim() == "*" {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|o| o.trim().parse().ok())
            .collect();
        layer.allow_origin(allowed)
    }
}

/// Unknown `/api` paths answer JSON, not the SPA index.
async fn api_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

// Static file handlers

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_app_js() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
}

async fn serve_style_css() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css")],
        STYLE_CSS,
    )
}
