//! 对话服务
//!
//! 会话创建、列表、历史查询，以及发送消息的完整流程：
//! 参数校验 → 会话与成员校验 → 等级门禁 → 上下文组装 → 上游补全 → 追加轮次并持久化。

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::completion::CompletionClient;
use crate::error::{AppError, Result};
use crate::models::conversation::Conversation;
use crate::models::turn::Turn;
use crate::observability::AppMetrics;
use crate::security::access_gate::{AccessDecision, AccessGate, DenyReason};
use crate::security::validation::RequestValidator;
use crate::services::context::ContextAssembler;
use crate::storage::repository::{AccountRepository, ConversationRepository};

/// 发送消息请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub content: String,
    pub model: String,
}

/// 发送消息结果
#[derive(Debug, Clone)]
pub struct SendMessageOutcome {
    pub user_turn: Turn,
    pub assistant_turn: Turn,
    pub chat_title: String,
}

/// 对话服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 创建会话，调用者总是参与者
    async fn create_chat(&self, caller_id: &str, participants: &[String]) -> Result<Conversation>;

    /// 列出调用者参与的会话
    async fn list_chats(&self, caller_id: &str) -> Result<Vec<Conversation>>;

    /// 发送消息
    async fn send_message(&self, caller_id: &str, request: SendMessage) -> Result<SendMessageOutcome>;

    /// 获取会话全部轮次
    async fn get_messages(&self, caller_id: &str, chat_id: &str) -> Result<Vec<Turn>>;
}

/// 对话服务实现
pub struct ChatServiceImpl {
    conversations: Arc<dyn ConversationRepository>,
    accounts: Arc<dyn AccountRepository>,
    gate: Arc<AccessGate>,
    completion: Arc<dyn CompletionClient>,
    assembler: ContextAssembler,
    validator: RequestValidator,
    metrics: Arc<AppMetrics>,
}

impl ChatServiceImpl {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        accounts: Arc<dyn AccountRepository>,
        gate: Arc<AccessGate>,
        completion: Arc<dyn CompletionClient>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            conversations,
            accounts,
            gate,
            completion,
            assembler: ContextAssembler::new(),
            validator: RequestValidator::new(),
            metrics,
        }
    }

    /// 加载会话并校验成员身份
    async fn load_for_participant(&self, caller_id: &str, chat_id: &str) -> Result<Conversation> {
        let conversation = self
            .conversations
            .get_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

        if !conversation.is_participant(caller_id) {
            return Err(AppError::Authorization("Access denied".to_string()));
        }

        Ok(conversation)
    }

    fn validate(&self, request: &SendMessage) -> Result<()> {
        self.validator.validate_required("chat_id", &request.chat_id)?;
        self.validator
            .validate_message_content("content", &request.content)?;
        self.validator.validate_model_id("model", &request.model)?;
        Ok(())
    }

    fn denial(&self, model: &str, reason: DenyReason) -> AppError {
        match reason {
            DenyReason::UnknownModel => {
                AppError::AccessDenied(format!("Access denied. Model {} is not available", model))
            }
            DenyReason::InsufficientTier { required } => AppError::AccessDenied(format!(
                "Access denied. {} subscription required for model {}",
                required.display_name(),
                model
            )),
        }
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn create_chat(&self, caller_id: &str, participants: &[String]) -> Result<Conversation> {
        let mut members: Vec<String> = vec![caller_id.to_string()];
        for participant in participants {
            if members.contains(participant) {
                continue;
            }
            if self.accounts.get_by_id(participant).await?.is_none() {
                return Err(AppError::Validation(
                    "One or more participants not found".to_string(),
                ));
            }
            members.push(participant.clone());
        }

        let conversation = Conversation::new(members);
        let created = self.conversations.create(&conversation).await?;
        info!(chat_id = %created.id, participants = created.participants.len(), "chat created");
        Ok(created)
    }

    async fn list_chats(&self, caller_id: &str) -> Result<Vec<Conversation>> {
        self.conversations.list_by_participant(caller_id).await
    }

    async fn send_message(&self, caller_id: &str, request: SendMessage) -> Result<SendMessageOutcome> {
        self.validate(&request)?;

        let mut conversation = self.load_for_participant(caller_id, &request.chat_id).await?;

        let account = self
            .accounts
            .get_by_id(caller_id)
            .await?
            .ok_or_else(|| AppError::Authentication("Account no longer exists".to_string()))?;

        if let AccessDecision::Deny(reason) = self.gate.check(account.tier, &request.model) {
            warn!(
                account_id = %caller_id,
                tier = %account.tier,
                model = %request.model,
                ?reason,
                "model access denied"
            );
            self.metrics.record_access_denied();
            return Err(self.denial(&request.model, reason));
        }

        let messages = self.assembler.build(&conversation.turns, &request.content);

        let reply = match self.completion.complete(&request.model, &messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(chat_id = %conversation.id, model = %request.model, error = %e, "upstream completion failed");
                self.metrics.record_upstream_fault();
                return Err(match e {
                    AppError::UpstreamFault(_) => e,
                    other => AppError::UpstreamFault(other.to_string()),
                });
            }
        };

        let user_turn = Turn::user(caller_id, &request.content, Utc::now());
        let assistant_turn = Turn::assistant(&reply, &request.model, Utc::now());
        conversation.append_exchange(user_turn.clone(), assistant_turn.clone());

        let saved = self.conversations.update(&conversation).await?;
        self.metrics.record_message_sent();
        info!(
            chat_id = %saved.id,
            model = %request.model,
            context = messages.len(),
            turns = saved.turn_count(),
            "message answered"
        );

        Ok(SendMessageOutcome {
            user_turn,
            assistant_turn,
            chat_title: saved.title,
        })
    }

    async fn get_messages(&self, caller_id: &str, chat_id: &str) -> Result<Vec<Turn>> {
        let conversation = self.load_for_participant(caller_id, chat_id).await?;
        Ok(conversation.turns)
    }
}

/// 创建对话服务
pub fn create_chat_service(
    conversations: Arc<dyn ConversationRepository>,
    accounts: Arc<dyn AccountRepository>,
    gate: Arc<AccessGate>,
    completion: Arc<dyn CompletionClient>,
    metrics: Arc<AppMetrics>,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(
        conversations,
        accounts,
        gate,
        completion,
        metrics,
    ))
}
