use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
    security::auth::Claims,
    services::chat::SendMessage,
};

pub async fn create_chat(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Creating chat for {} with {} participants",
        claims.sub,
        request.participants.len()
    );

    let conversation = state
        .chat_service
        .create_chat(claims.account_id(), &request.participants)
        .await?;

    Ok((StatusCode::CREATED, Json(ChatResponse::from(conversation))))
}

pub async fn list_chats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let chats: Vec<ChatResponse> = state
        .chat_service
        .list_chats(claims.account_id())
        .await?
        .into_iter()
        .map(ChatResponse::from)
        .collect();

    Ok(Json(chats))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Sending message to chat {} with model {}",
        request.chat_id, request.model
    );

    let outcome = state
        .chat_service
        .send_message(
            claims.account_id(),
            SendMessage {
                chat_id: request.chat_id,
                content: request.content,
                model: request.model,
            },
        )
        .await?;

    Ok(Json(SendMessageResponse {
        user_message: outcome.user_turn.into(),
        ai_response: outcome.assistant_turn.into(),
        chat_title: outcome.chat_title,
    }))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(chat_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let turns: Vec<TurnResponse> = state
        .chat_service
        .get_messages(claims.account_id(), &chat_id)
        .await?
        .into_iter()
        .map(TurnResponse::from)
        .collect();

    Ok(Json(turns))
}
