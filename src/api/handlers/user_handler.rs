use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::user_dto::*},
    error::AppError,
    security::auth::Claims,
    services::account::Registration,
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Registering account: {}", request.username);

    let session = state
        .account_service
        .register(Registration {
            name: request.name,
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(session.account, session.token)),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .account_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse::new(session.account, session.token)))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.account_service.profile(claims.account_id()).await?;
    Ok(Json(ProfileResponse::from(account)))
}
