//! Model Routes
//!
//! 目录公开，可用列表需要认证。

use axum::{Router, middleware, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::model_handler::*;
use crate::security::middleware::auth_middleware;

/// 创建模型目录路由器
pub fn create_model_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/available", get(available_models))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/", get(list_models)).merge(protected)
}
