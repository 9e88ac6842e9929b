//! SurrealDB 存储实现
//!
//! 每条记录以 `{ data: <实体> }` 形式保存，避免实体自身的 `id` 字段与记录 ID 冲突。

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use tokio::sync::RwLock;

use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::account::Account;
use crate::models::conversation::Conversation;
use crate::models::payment::{PaymentOrder, PaymentRecord};
use crate::storage::repository::{
    AccountRepository, ConversationRepository, OrderRepository, PaymentRepository, Repositories,
};

const ACCOUNT_TABLE: &str = "account";
const CONVERSATION_TABLE: &str = "conversation";
const PAYMENT_TABLE: &str = "payment";
const ORDER_TABLE: &str = "payment_order";

/// SurrealDB 连接池
#[derive(Clone)]
pub struct SurrealPool {
    /// 数据库连接
    db: Arc<RwLock<Option<Surreal<Any>>>>,
}

impl std::fmt::Debug for SurrealPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealPool").finish_non_exhaustive()
    }
}

impl SurrealPool {
    /// 创建新的连接池
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db: Surreal<Any> = connect(config.url.as_str()).await?;

        // 认证
        if !config.username.is_empty() {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await?;
        }

        // 选择命名空间和数据库
        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;

        Ok(Self {
            db: Arc::new(RwLock::new(Some(db))),
        })
    }

    /// 获取内部数据库实例
    pub async fn inner(&self) -> Result<Surreal<Any>> {
        self.db
            .read()
            .await
            .as_ref()
            .cloned()
            .ok_or_else(|| AppError::Database("Database connection closed".to_string()))
    }

    /// 连通性检查
    pub async fn health(&self) -> Result<()> {
        self.inner().await?.health().await?;
        Ok(())
    }

    /// 关闭连接
    pub async fn close(&self) {
        *self.db.write().await = None;
    }

    /// 基于该连接构建全部仓储
    pub fn repositories(&self) -> Repositories {
        Repositories {
            accounts: Arc::new(SurrealAccountRepository::new(self.clone())),
            conversations: Arc::new(SurrealConversationRepository::new(self.clone())),
            payments: Arc::new(SurrealPaymentRepository::new(self.clone())),
            orders: Arc::new(SurrealOrderRepository::new(self.clone())),
        }
    }
}

/// 存储外壳
#[derive(Debug, Serialize, Deserialize)]
struct Record<T> {
    data: T,
}

async fn create_record<T>(pool: &SurrealPool, table: &str, id: &str, entity: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let created: Option<Record<T>> = pool
        .inner()
        .await?
        .create((table, id))
        .content(Record {
            data: entity.clone(),
        })
        .await?;

    created
        .map(|r| r.data)
        .ok_or_else(|| AppError::Database(format!("Failed to create {}: {}", table, id)))
}

async fn select_record<T>(pool: &SurrealPool, table: &str, id: &str) -> Result<Option<T>>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let record: Option<Record<T>> = pool.inner().await?.select((table, id)).await?;
    Ok(record.map(|r| r.data))
}

async fn update_record<T>(pool: &SurrealPool, table: &str, id: &str, entity: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let updated: Option<Record<T>> = pool
        .inner()
        .await?
        .update((table, id))
        .content(Record {
            data: entity.clone(),
        })
        .await?;

    updated
        .map(|r| r.data)
        .ok_or_else(|| AppError::NotFound(format!("{} {}", table, id)))
}

async fn find_one<T>(pool: &SurrealPool, query: &'static str, value: &str) -> Result<Option<T>>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let records: Vec<Record<T>> = pool
        .inner()
        .await?
        .query(query)
        .bind(("value", value.to_string()))
        .await?
        .take(0)?;
    Ok(records.into_iter().next().map(|r| r.data))
}

/// 账户仓储实现
#[derive(Clone)]
pub struct SurrealAccountRepository {
    pool: SurrealPool,
}

impl SurrealAccountRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SurrealAccountRepository {
    async fn create(&self, account: &Account) -> Result<Account> {
        create_record(&self.pool, ACCOUNT_TABLE, &account.id, account).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Account>> {
        select_record(&self.pool, ACCOUNT_TABLE, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        find_one(
            &self.pool,
            "SELECT * FROM account WHERE data.email = $value LIMIT 1",
            email,
        )
        .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        find_one(
            &self.pool,
            "SELECT * FROM account WHERE data.username = $value LIMIT 1",
            username,
        )
        .await
    }

    async fn update(&self, account: &Account) -> Result<Account> {
        update_record(&self.pool, ACCOUNT_TABLE, &account.id, account).await
    }
}

/// 会话仓储实现
#[derive(Clone)]
pub struct SurrealConversationRepository {
    pool: SurrealPool,
}

impl SurrealConversationRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for SurrealConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        create_record(&self.pool, CONVERSATION_TABLE, &conversation.id, conversation).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        select_record(&self.pool, CONVERSATION_TABLE, id).await
    }

    async fn update(&self, conversation: &Conversation) -> Result<Conversation> {
        update_record(&self.pool, CONVERSATION_TABLE, &conversation.id, conversation).await
    }

    async fn list_by_participant(&self, account_id: &str) -> Result<Vec<Conversation>> {
        let query = "
            SELECT * FROM conversation
            WHERE data.participants CONTAINS $account_id
            ORDER BY data.updated_at DESC
        ";
        let records: Vec<Record<Conversation>> = self
            .pool
            .inner()
            .await?
            .query(query)
            .bind(("account_id", account_id.to_string()))
            .await?
            .take(0)?;

        let mut result: Vec<Conversation> = records.into_iter().map(|r| r.data).collect();
        // 时间以字符串存储，这里按真实时间再排一次
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }
}

/// 支付记录仓储实现
#[derive(Clone)]
pub struct SurrealPaymentRepository {
    pool: SurrealPool,
}

impl SurrealPaymentRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for SurrealPaymentRepository {
    async fn create(&self, record: &PaymentRecord) -> Result<PaymentRecord> {
        create_record(&self.pool, PAYMENT_TABLE, &record.id, record).await
    }

    async fn list_by_account(&self, account_id: &str, limit: usize) -> Result<Vec<PaymentRecord>> {
        let query = "
            SELECT * FROM payment
            WHERE data.account_id = $account_id
            ORDER BY data.created_at DESC
            LIMIT $limit
        ";
        let records: Vec<Record<PaymentRecord>> = self
            .pool
            .inner()
            .await?
            .query(query)
            .bind(("account_id", account_id.to_string()))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(records.into_iter().map(|r| r.data).collect())
    }
}

/// 订单仓储实现
#[derive(Clone)]
pub struct SurrealOrderRepository {
    pool: SurrealPool,
}

impl SurrealOrderRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SurrealOrderRepository {
    async fn create(&self, order: &PaymentOrder) -> Result<PaymentOrder> {
        create_record(&self.pool, ORDER_TABLE, &order.order_id, order).await
    }

    async fn get_by_id(&self, order_id: &str) -> Result<Option<PaymentOrder>> {
        select_record(&self.pool, ORDER_TABLE, order_id).await
    }

    async fn mark_paid(&self, order_id: &str) -> Result<bool> {
        // 条件更新，只有 created 状态的订单会被改写
        let query = "
            UPDATE type::thing($table, $id)
            SET data.status = 'paid'
            WHERE data.status = 'created'
            RETURN AFTER
        ";
        let updated: Vec<Record<PaymentOrder>> = self
            .pool
            .inner()
            .await?
            .query(query)
            .bind(("table", ORDER_TABLE))
            .bind(("id", order_id.to_string()))
            .await?
            .take(0)?;

        if !updated.is_empty() {
            return Ok(true);
        }
        match self.get_by_id(order_id).await? {
            Some(_) => Ok(false),
            None => Err(AppError::NotFound(format!("order {}", order_id))),
        }
    }
}
