//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::security::middleware::{
    not_found_handler, rate_limit_middleware, security_headers_middleware,
};
use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 构建 CORS 层；未配置来源时允许任意来源
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

pub fn create_router(app_state: AppState, allowed_origins: &[String]) -> Router {
    let api = Router::new()
        .nest("/users", routes::user_routes::create_user_router(app_state.clone()))
        .nest("/chat", routes::chat_routes::create_chat_router(app_state.clone()))
        .nest(
            "/payment",
            routes::payment_routes::create_payment_router(app_state.clone()),
        )
        .nest("/models", routes::model_routes::create_model_router(app_state.clone()));

    Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit_middleware,
        ))
        // Add security headers middleware to all routes
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(app_state)
}

pub async fn initialize_api(
    app_state: AppState,
    allowed_origins: &[String],
) -> Result<Router, AppError> {
    tracing::info!("Initializing API router...");
    Ok(create_router(app_state, allowed_origins))
}
