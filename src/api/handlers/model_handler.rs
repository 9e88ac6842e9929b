use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};

use crate::{
    api::{app_state::AppState, dto::model_dto::*},
    error::AppError,
    models::tier::Tier,
    security::auth::Claims,
};

/// 按最低等级分组列出目录
pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.access_gate.catalog();
    let tiers = Tier::ALL
        .iter()
        .map(|tier| TierModels {
            tier: *tier,
            models: catalog
                .entries()
                .iter()
                .filter(|entry| entry.minimum_tier == *tier)
                .map(ModelResponse::from)
                .collect(),
        })
        .collect();

    Json(ModelCatalogResponse { tiers })
}

/// 调用者等级可用的模型，与门禁同源
pub async fn available_models(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let tier = state.account_service.profile(claims.account_id()).await?.tier;
    let models = state
        .access_gate
        .available_models(tier)
        .into_iter()
        .map(ModelResponse::from)
        .collect();

    Ok(Json(AvailableModelsResponse { tier, models }))
}
