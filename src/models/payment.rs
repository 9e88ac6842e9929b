use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::tier::Tier;

/// 结算货币
pub const CURRENCY: &str = "INR";

/// 可购买的套餐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Professional,
    Enterprise,
}

impl Plan {
    /// 金额（最小货币单位，paise）
    pub fn amount(&self) -> u64 {
        match self {
            Plan::Professional => 24_900,
            Plan::Enterprise => 59_900,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Plan::Professional => "Professional Plan",
            Plan::Enterprise => "Enterprise Plan",
        }
    }

    /// 支付成功后授予的等级
    pub fn tier(&self) -> Tier {
        match self {
            Plan::Professional => Tier::Professional,
            Plan::Enterprise => Tier::Enterprise,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Professional => "professional",
            Plan::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professional" => Ok(Plan::Professional),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(format!("Invalid plan: {}", other)),
        }
    }
}

/// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Failed,
}

/// 支付记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// 记录唯一标识
    pub id: String,
    /// 付款账号
    pub account_id: String,
    /// 网关订单号
    pub order_id: String,
    /// 网关支付号
    pub payment_id: String,
    /// 网关签名
    pub signature: String,
    /// 金额（paise）
    pub amount: u64,
    /// 货币
    pub currency: String,
    /// 套餐
    pub plan: Plan,
    /// 状态
    pub status: PaymentStatus,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(
        account_id: &str,
        order_id: &str,
        payment_id: &str,
        signature: &str,
        plan: Plan,
        status: PaymentStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            signature: signature.to_string(),
            amount: plan.amount(),
            currency: CURRENCY.to_string(),
            plan,
            status,
            created_at: Utc::now(),
        }
    }
}

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// 已创建，等待支付
    Created,
    /// 已校验并兑现
    Paid,
}

/// 网关订单
///
/// 创建时绑定下单账号与套餐，校验支付时以此为准。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// 网关订单号
    pub order_id: String,
    /// 下单账号
    pub account_id: String,
    pub plan: Plan,
    /// 金额（paise）
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentOrder {
    pub fn new(order_id: &str, account_id: &str, plan: Plan, amount: u64, currency: &str, receipt: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            account_id: account_id.to_string(),
            plan,
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            status: OrderStatus::Created,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}
