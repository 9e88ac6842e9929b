//! 对话 DTO
//!
//! 定义会话与消息相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::conversation::Conversation;
use crate::models::turn::{Author, Turn};

/// 创建会话请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateChatRequest {
    /// 额外参与者账户 ID
    pub participants: Vec<String>,
}

/// 单条轮次
#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    pub id: String,
    pub author: Author,
    pub content: String,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Turn> for TurnResponse {
    fn from(turn: Turn) -> Self {
        Self {
            id: turn.id,
            author: turn.author,
            content: turn.body,
            model: turn.model,
            created_at: turn.created_at,
        }
    }
}

/// 会话响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub participants: Vec<String>,
    pub title: String,
    pub messages: Vec<TurnResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ChatResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id,
            participants: conversation.participants,
            title: conversation.title,
            messages: conversation.turns.into_iter().map(TurnResponse::from).collect(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

/// 发送消息请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub content: String,
    pub model: String,
}

/// 发送消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub user_message: TurnResponse,
    pub ai_response: TurnResponse,
    pub chat_title: String,
}
