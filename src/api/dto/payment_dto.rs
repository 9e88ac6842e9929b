//! 支付 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::payment::{PaymentRecord, PaymentStatus, Plan};
use crate::models::tier::Tier;

/// 创建订单请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub plan: String,
}

/// 创建订单响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub plan: Plan,
    pub plan_name: String,
    /// 前端结账使用的公开 key
    pub key_id: String,
}

/// 支付校验请求（字段名与网关回调一致）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// 可选；给出时必须与订单套餐一致
    pub plan: String,
}

/// 支付校验响应
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub message: String,
    pub role: Tier,
    pub payment_id: String,
}

/// 当前等级
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub role: Tier,
}

/// 支付记录（不含签名）
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentRecordResponse {
    pub id: String,
    pub order_id: String,
    pub payment_id: String,
    pub amount: u64,
    pub currency: String,
    pub plan: Plan,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentRecordResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id,
            order_id: record.order_id,
            payment_id: record.payment_id,
            amount: record.amount,
            currency: record.currency,
            plan: record.plan,
            status: record.status,
            created_at: record.created_at,
        }
    }
}
