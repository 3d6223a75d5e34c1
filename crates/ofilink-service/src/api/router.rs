//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::aiconta;
use crate::config::ServerConfig;
use crate::error::ServiceError;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn build_router(state: AppState, server: &ServerConfig) -> Result<Router, ServiceError> {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/clientes",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .nest("/aiconta", aiconta::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins)?)
        .with_state(state))
}

/// CORS policy for browser frontends.
///
/// An empty origin list allows any origin. Otherwise only listed origins get
/// CORS headers back.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServiceError> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                ServiceError::Config(format!("invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}
