//! Payment Routes

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::app_state::AppState;
use crate::api::handlers::payment_handler::*;
use crate::security::middleware::auth_middleware;

/// 创建支付路由器
pub fn create_payment_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/order", post(create_order))
        .route("/verify", post(verify_payment))
        .route("/status", get(payment_status))
        .route("/history", get(payment_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
