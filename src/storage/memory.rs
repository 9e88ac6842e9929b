//! 内存存储实现
//!
//! 基于 DashMap，用于开发环境与测试。

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::account::Account;
use crate::models::conversation::Conversation;
use crate::models::payment::{OrderStatus, PaymentOrder, PaymentRecord};
use crate::storage::repository::{
    AccountRepository, ConversationRepository, OrderRepository, PaymentRepository, Repositories,
};

/// 内存账户仓储
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<DashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> Result<Account> {
        if self.accounts.contains_key(&account.id) {
            return Err(AppError::Conflict(format!("account {} already exists", account.id)));
        }
        self.accounts.insert(account.id.clone(), account.clone());
        Ok(account.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.get(id).map(|a| a.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.email == email)
            .map(|a| a.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.value().clone()))
    }

    async fn update(&self, account: &Account) -> Result<Account> {
        match self.accounts.get_mut(&account.id) {
            Some(mut existing) => {
                *existing = account.clone();
                Ok(account.clone())
            }
            None => Err(AppError::NotFound(format!("account {}", account.id))),
        }
    }
}

/// 内存会话仓储
#[derive(Debug, Default, Clone)]
pub struct InMemoryConversationRepository {
    conversations: Arc<DashMap<String, Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        self.conversations
            .insert(conversation.id.clone(), conversation.clone());
        Ok(conversation.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversations.get(id).map(|c| c.value().clone()))
    }

    async fn update(&self, conversation: &Conversation) -> Result<Conversation> {
        match self.conversations.get_mut(&conversation.id) {
            Some(mut existing) => {
                *existing = conversation.clone();
                Ok(conversation.clone())
            }
            None => Err(AppError::NotFound(format!("chat {}", conversation.id))),
        }
    }

    async fn list_by_participant(&self, account_id: &str) -> Result<Vec<Conversation>> {
        let mut result: Vec<Conversation> = self
            .conversations
            .iter()
            .filter(|c| c.is_participant(account_id))
            .map(|c| c.value().clone())
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }
}

/// 内存支付记录仓储
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaymentRepository {
    records: Arc<DashMap<String, PaymentRecord>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, record: &PaymentRecord) -> Result<PaymentRecord> {
        self.records.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    async fn list_by_account(&self, account_id: &str, limit: usize) -> Result<Vec<PaymentRecord>> {
        let mut result: Vec<PaymentRecord> = self
            .records
            .iter()
            .filter(|r| r.account_id == account_id)
            .map(|r| r.value().clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit);
        Ok(result)
    }
}

/// 内存订单仓储
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<DashMap<String, PaymentOrder>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &PaymentOrder) -> Result<PaymentOrder> {
        match self.orders.entry(order.order_id.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "order {} already exists",
                order.order_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(order.clone());
                Ok(order.clone())
            }
        }
    }

    async fn get_by_id(&self, order_id: &str) -> Result<Option<PaymentOrder>> {
        Ok(self.orders.get(order_id).map(|o| o.value().clone()))
    }

    async fn mark_paid(&self, order_id: &str) -> Result<bool> {
        match self.orders.get_mut(order_id) {
            Some(mut order) if order.status == OrderStatus::Created => {
                order.status = OrderStatus::Paid;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(AppError::NotFound(format!("order {}", order_id))),
        }
    }
}

/// 创建一组空的内存仓储
pub fn in_memory_repositories() -> Repositories {
    Repositories {
        accounts: Arc::new(InMemoryAccountRepository::new()),
        conversations: Arc::new(InMemoryConversationRepository::new()),
        payments: Arc::new(InMemoryPaymentRepository::new()),
        orders: Arc::new(InMemoryOrderRepository::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{PaymentStatus, Plan};
    use crate::models::turn::Turn;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_account_lookup_by_email_and_username() {
        let repo = InMemoryAccountRepository::new();
        let account = Account::new("Jane", "jane", "jane@example.com", "hash");
        repo.create(&account).await.unwrap();

        assert!(repo.find_by_email("jane@example.com").await.unwrap().is_some());
        assert!(repo.find_by_username("jane").await.unwrap().is_some());
        assert!(repo.find_by_email("other@example.com").await.unwrap().is_none());
        assert!(matches!(
            repo.create(&account).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let repo = InMemoryAccountRepository::new();
        let account = Account::new("Jane", "jane", "jane@example.com", "hash");
        assert!(matches!(
            repo.update(&account).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_conversations_listed_by_recent_activity() {
        let repo = InMemoryConversationRepository::new();
        let older = Conversation::new(vec!["a".into(), "b".into()]);
        let mut newer = Conversation::new(vec!["a".into()]);
        newer.updated_at = older.updated_at + Duration::seconds(5);
        let foreign = Conversation::new(vec!["c".into()]);

        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();
        repo.create(&foreign).await.unwrap();

        let listed = repo.list_by_participant("a").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
        assert_eq!(repo.list_by_participant("b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_conversation_update_persists_turns() {
        let repo = InMemoryConversationRepository::new();
        let mut conversation = Conversation::new(vec!["a".into()]);
        repo.create(&conversation).await.unwrap();

        let now = Utc::now();
        conversation.append_exchange(
            Turn::user("a", "hello", now),
            Turn::assistant("hi", "x-ai/grok-4-fast:free", now),
        );
        repo.update(&conversation).await.unwrap();

        let loaded = repo.get_by_id(&conversation.id).await.unwrap().unwrap();
        assert_eq!(loaded.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_payment_history_newest_first_and_limited() {
        let repo = InMemoryPaymentRepository::new();
        let base = Utc::now();
        for i in 0..12 {
            let mut record = PaymentRecord::new(
                "acc",
                &format!("order_{}", i),
                &format!("pay_{}", i),
                "sig",
                Plan::Professional,
                PaymentStatus::Completed,
            );
            record.created_at = base + Duration::seconds(i);
            repo.create(&record).await.unwrap();
        }

        let history = repo.list_by_account("acc", 10).await.unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].order_id, "order_11");
        assert_eq!(history[9].order_id, "order_2");
        assert!(repo.list_by_account("other", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_is_paid_only_once() {
        let repo = InMemoryOrderRepository::new();
        let order = PaymentOrder::new("order_1", "acc", Plan::Professional, 24_900, "INR", "r1");
        repo.create(&order).await.unwrap();

        assert!(repo.mark_paid("order_1").await.unwrap());
        assert!(!repo.mark_paid("order_1").await.unwrap());
        assert!(repo.get_by_id("order_1").await.unwrap().unwrap().is_paid());
        assert!(matches!(
            repo.mark_paid("order_2").await,
            Err(AppError::NotFound(_))
        ));
    }
}
