//! User Routes
//!
//! 注册与登录公开，其余需要认证。

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::app_state::AppState;
use crate::api::handlers::user_handler::*;
use crate::security::middleware::auth_middleware;

/// 创建账户路由器
pub fn create_user_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}
