//! Chat Routes

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::app_state::AppState;
use crate::api::handlers::chat_handler::*;
use crate::security::middleware::auth_middleware;

/// 创建对话路由器
pub fn create_chat_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_chat).get(list_chats))
        .route("/message", post(send_message))
        .route("/:chat_id/messages", get(get_messages))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
