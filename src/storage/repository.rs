use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::account::Account;
use crate::models::conversation::Conversation;
use crate::models::payment::{PaymentOrder, PaymentRecord};

/// 账户仓储 trait
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// 创建账户
    async fn create(&self, account: &Account) -> Result<Account>;

    /// 根据 ID 获取账户
    async fn get_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// 根据邮箱查找
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// 根据用户名查找
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// 整体覆盖更新
    async fn update(&self, account: &Account) -> Result<Account>;
}

/// 会话仓储 trait
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// 创建会话
    async fn create(&self, conversation: &Conversation) -> Result<Conversation>;

    /// 根据 ID 获取会话（含全部轮次）
    async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>>;

    /// 整体覆盖更新
    async fn update(&self, conversation: &Conversation) -> Result<Conversation>;

    /// 列出账户参与的会话，按 updated_at 倒序
    async fn list_by_participant(&self, account_id: &str) -> Result<Vec<Conversation>>;
}

/// 支付记录仓储 trait
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// 保存支付记录
    async fn create(&self, record: &PaymentRecord) -> Result<PaymentRecord>;

    /// 列出账户最近的支付记录，按 created_at 倒序
    async fn list_by_account(&self, account_id: &str, limit: usize) -> Result<Vec<PaymentRecord>>;
}

/// 订单仓储 trait
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 保存新订单
    async fn create(&self, order: &PaymentOrder) -> Result<PaymentOrder>;

    /// 根据网关订单号获取
    async fn get_by_id(&self, order_id: &str) -> Result<Option<PaymentOrder>>;

    /// 将订单标记为已支付
    ///
    /// 订单已支付时返回 `false`，同一订单只会兑现一次。
    async fn mark_paid(&self, order_id: &str) -> Result<bool>;
}

/// 仓储集合
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("accounts", &"Arc<dyn AccountRepository>")
            .field("conversations", &"Arc<dyn ConversationRepository>")
            .field("payments", &"Arc<dyn PaymentRepository>")
            .field("orders", &"Arc<dyn OrderRepository>")
            .finish()
    }
}
