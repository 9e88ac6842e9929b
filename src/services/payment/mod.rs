//! 支付服务
//!
//! 创建网关订单、校验支付签名并提升账户等级。
//! 订单在创建时绑定下单账号与套餐，校验时只认已保存的订单。

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::payment_gateway::PaymentGateway;
use crate::error::{AppError, Result};
use crate::models::payment::{CURRENCY, PaymentOrder, PaymentRecord, PaymentStatus, Plan};
use crate::models::tier::Tier;
use crate::observability::AppMetrics;
use crate::storage::repository::{AccountRepository, OrderRepository, PaymentRepository};

/// 支付历史默认条数
pub const HISTORY_LIMIT: usize = 10;

/// 已创建的订单
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub plan: Plan,
    pub key_id: String,
}

/// 结账回调参数
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    /// 客户端声明的套餐，只用于与订单比对
    pub plan: Option<Plan>,
}

/// 校验成功结果
#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub record: PaymentRecord,
    pub tier: Tier,
}

/// 支付服务 trait
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// 为套餐创建订单并保存
    async fn create_order(&self, account_id: &str, plan: Plan) -> Result<CreatedOrder>;

    /// 校验签名；失败时记录 failed 并返回错误
    async fn verify(&self, account_id: &str, confirmation: PaymentConfirmation) -> Result<VerifiedPayment>;

    /// 当前等级
    async fn status(&self, account_id: &str) -> Result<Tier>;

    /// 最近的支付记录
    async fn history(&self, account_id: &str) -> Result<Vec<PaymentRecord>>;
}

/// 支付服务实现
pub struct PaymentServiceImpl {
    payments: Arc<dyn PaymentRepository>,
    orders: Arc<dyn OrderRepository>,
    accounts: Arc<dyn AccountRepository>,
    gateway: Arc<dyn PaymentGateway>,
    metrics: Arc<AppMetrics>,
}

impl PaymentServiceImpl {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        orders: Arc<dyn OrderRepository>,
        accounts: Arc<dyn AccountRepository>,
        gateway: Arc<dyn PaymentGateway>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            payments,
            orders,
            accounts,
            gateway,
            metrics,
        }
    }

    /// 加载属于调用者且尚未兑现的订单
    async fn load_open_order(&self, account_id: &str, confirmation: &PaymentConfirmation) -> Result<PaymentOrder> {
        let order = self
            .orders
            .get_by_id(&confirmation.order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if order.account_id != account_id {
            warn!(account_id, order_id = %order.order_id, "payment for another account's order");
            return Err(AppError::Authorization("Access denied".to_string()));
        }
        if order.is_paid() {
            return Err(AppError::Conflict("Order already processed".to_string()));
        }
        if confirmation.plan.is_some_and(|plan| plan != order.plan) {
            return Err(AppError::Validation("Plan does not match order".to_string()));
        }
        Ok(order)
    }
}

#[async_trait]
impl PaymentService for PaymentServiceImpl {
    async fn create_order(&self, account_id: &str, plan: Plan) -> Result<CreatedOrder> {
        let receipt = format!("receipt_order_{}", Utc::now().timestamp_millis());
        let gateway_order = self
            .gateway
            .create_order(plan.amount(), CURRENCY, &receipt)
            .await?;

        let order = PaymentOrder::new(
            &gateway_order.id,
            account_id,
            plan,
            gateway_order.amount,
            &gateway_order.currency,
            gateway_order.receipt.as_deref().unwrap_or(&receipt),
        );
        let order = self.orders.create(&order).await?;

        info!(account_id, order_id = %order.order_id, plan = %plan, "payment order created");

        Ok(CreatedOrder {
            order_id: order.order_id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
            plan,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    async fn verify(&self, account_id: &str, confirmation: PaymentConfirmation) -> Result<VerifiedPayment> {
        let order = self.load_open_order(account_id, &confirmation).await?;

        let valid = self.gateway.verify_signature(
            &order.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        );
        let status = if valid {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        };

        let mut record = PaymentRecord::new(
            account_id,
            &order.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
            order.plan,
            status,
        );
        record.amount = order.amount;
        record.currency = order.currency.clone();

        if !valid {
            self.payments.create(&record).await?;
            self.metrics.record_payment(false);
            warn!(account_id, order_id = %order.order_id, "payment signature mismatch");
            return Err(AppError::Validation("Payment verification failed".to_string()));
        }

        if !self.orders.mark_paid(&order.order_id).await? {
            return Err(AppError::Conflict("Order already processed".to_string()));
        }
        let record = self.payments.create(&record).await?;
        self.metrics.record_payment(true);

        let mut account = self
            .accounts
            .get_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if account.raise_tier(order.plan.tier()) {
            account = self.accounts.update(&account).await?;
        }

        info!(account_id, payment = %record.id, tier = %account.tier, "payment verified");
        Ok(VerifiedPayment {
            record,
            tier: account.tier,
        })
    }

    async fn status(&self, account_id: &str) -> Result<Tier> {
        self.accounts
            .get_by_id(account_id)
            .await?
            .map(|a| a.tier)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn history(&self, account_id: &str) -> Result<Vec<PaymentRecord>> {
        self.payments.list_by_account(account_id, HISTORY_LIMIT).await
    }
}

/// 创建支付服务
pub fn create_payment_service(
    payments: Arc<dyn PaymentRepository>,
    orders: Arc<dyn OrderRepository>,
    accounts: Arc<dyn AccountRepository>,
    gateway: Arc<dyn PaymentGateway>,
    metrics: Arc<AppMetrics>,
) -> Box<dyn PaymentService> {
    Box::new(PaymentServiceImpl::new(payments, orders, accounts, gateway, metrics))
}
