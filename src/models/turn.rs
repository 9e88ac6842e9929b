use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 消息作者
///
/// 助手是独立的变体，不与任何账号标识共享取值空间。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Author {
    /// 由某个账号发送
    User { account_id: String },
    /// 由模型生成
    Assistant,
}

impl Author {
    pub fn user(account_id: &str) -> Self {
        Author::User {
            account_id: account_id.to_string(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Author::Assistant)
    }

    /// 账号标识（助手消息为 None）
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Author::User { account_id } => Some(account_id),
            Author::Assistant => None,
        }
    }
}

/// 对话轮次
///
/// 创建后不可变，会话中的轮次序列只追加。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// 轮次唯一标识
    pub id: String,

    /// 作者
    pub author: Author,

    /// 消息正文
    pub body: String,

    /// 使用的模型（用户消息为 None）
    pub model: Option<String>,

    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// 创建用户轮次
    pub fn user(account_id: &str, body: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: Author::user(account_id),
            body: body.to_string(),
            model: None,
            created_at,
        }
    }

    /// 创建助手轮次
    pub fn assistant(body: &str, model: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: Author::Assistant,
            body: body.to_string(),
            model: Some(model.to_string()),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_turn_has_no_model() {
        let turn = Turn::user("acc_1", "hello", Utc::now());
        assert_eq!(turn.author.account_id(), Some("acc_1"));
        assert!(turn.model.is_none());
    }

    #[test]
    fn test_assistant_author_serializes_without_account() {
        let turn = Turn::assistant("hi there", "x-ai/grok-4-fast:free", Utc::now());
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["author"]["type"], "assistant");
        assert!(value["author"].get("account_id").is_none());
    }

    #[test]
    fn test_account_named_like_assistant_stays_user() {
        let author = Author::user("assistant");
        assert!(!author.is_assistant());
        let json = serde_json::to_string(&author).unwrap();
        let back: Author = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Author::user("assistant"));
    }
}
