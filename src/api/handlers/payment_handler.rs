use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::payment_dto::*},
    error::AppError,
    models::payment::Plan,
    security::auth::Claims,
    services::payment::PaymentConfirmation,
};

fn parse_plan(plan: &str) -> Result<Plan, AppError> {
    plan.parse().map_err(AppError::Validation)
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating order for plan {}", request.plan);

    let plan = parse_plan(&request.plan)?;
    let order = state
        .payment_service
        .create_order(claims.account_id(), plan)
        .await?;

    Ok(Json(CreateOrderResponse {
        order_id: order.order_id,
        amount: order.amount,
        currency: order.currency,
        receipt: order.receipt,
        plan: order.plan,
        plan_name: order.plan.name().to_string(),
        key_id: order.key_id,
    }))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.razorpay_order_id.is_empty()
        || request.razorpay_payment_id.is_empty()
        || request.razorpay_signature.is_empty()
    {
        return Err(AppError::Validation(
            "Missing payment verification fields".to_string(),
        ));
    }
    let plan = match request.plan.as_str() {
        "" => None,
        claimed => Some(parse_plan(claimed)?),
    };

    let verified = state
        .payment_service
        .verify(
            claims.account_id(),
            PaymentConfirmation {
                order_id: request.razorpay_order_id,
                payment_id: request.razorpay_payment_id,
                signature: request.razorpay_signature,
                plan,
            },
        )
        .await?;

    Ok(Json(VerifyPaymentResponse {
        message: format!(
            "Payment verified. Subscription upgraded to {}",
            verified.tier.display_name()
        ),
        role: verified.tier,
        payment_id: verified.record.payment_id,
    }))
}

pub async fn payment_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.payment_service.status(claims.account_id()).await?;
    Ok(Json(PaymentStatusResponse { role }))
}

pub async fn payment_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let records: Vec<PaymentRecordResponse> = state
        .payment_service
        .history(claims.account_id())
        .await?
        .into_iter()
        .map(PaymentRecordResponse::from)
        .collect();

    Ok(Json(records))
}
