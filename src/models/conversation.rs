use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::turn::Turn;

/// 新会话的占位标题
pub const DEFAULT_TITLE: &str = "New Conversation";

/// 标题最多保留的字符数
pub const TITLE_MAX_CHARS: usize = 30;

/// 截断后追加的省略标记
pub const TITLE_ELLIPSIS: &str = "...";

/// 由首条用户消息生成标题
///
/// 按字符（而非字节）截断到 30 个，超出时追加 `...`。
pub fn derive_title(body: &str) -> String {
    let mut chars = body.chars();
    let prefix: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}{}", prefix, TITLE_ELLIPSIS)
    } else {
        prefix
    }
}

/// 会话实体
///
/// 有序、只追加的轮次序列，由一个或多个账号共同拥有。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// 会话唯一标识
    pub id: String,

    /// 参与者账号
    pub participants: Vec<String>,

    /// 展示标题
    pub title: String,

    /// 标题是否已由首条消息生成
    #[serde(default)]
    pub title_derived: bool,

    /// 轮次序列
    #[serde(default)]
    pub turns: Vec<Turn>,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// 创建空会话
    pub fn new(participants: Vec<String>) -> Self {
        Self::with_title(participants, DEFAULT_TITLE)
    }

    /// 以种子标题创建会话
    pub fn with_title(participants: Vec<String>, title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            participants,
            title: title.to_string(),
            title_derived: false,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_participant(&self, account_id: &str) -> bool {
        self.participants.iter().any(|p| p == account_id)
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// 下一条用户消息是否会触发标题生成
    pub fn needs_title(&self) -> bool {
        !self.title_derived && (self.title == DEFAULT_TITLE || self.turns.is_empty())
    }

    /// 追加一组用户/助手轮次
    ///
    /// 标题判断发生在追加之前；只有上游成功返回后才应调用。
    pub fn append_exchange(&mut self, user_turn: Turn, assistant_turn: Turn) {
        if self.needs_title() {
            self.title = derive_title(&user_turn.body);
            self.title_derived = true;
        }
        self.updated_at = assistant_turn.created_at.max(user_turn.created_at);
        self.turns.push(user_turn);
        self.turns.push(assistant_turn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(body: &str) -> (Turn, Turn) {
        let now = Utc::now();
        (
            Turn::user("acc_1", body, now),
            Turn::assistant("reply", "x-ai/grok-4-fast:free", now),
        )
    }

    #[test]
    fn test_derive_title_truncates_long_body() {
        let body = "a".repeat(40);
        let title = derive_title(&body);
        assert_eq!(title, format!("{}...", "a".repeat(30)));
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn test_derive_title_keeps_short_body() {
        assert_eq!(derive_title("0123456789"), "0123456789");
        assert_eq!(derive_title(&"b".repeat(30)), "b".repeat(30));
    }

    #[test]
    fn test_derive_title_counts_characters() {
        let body = "你".repeat(31);
        assert_eq!(derive_title(&body), format!("{}...", "你".repeat(30)));
    }

    #[test]
    fn test_first_exchange_sets_title_once() {
        let mut conversation = Conversation::new(vec!["acc_1".into()]);
        let (u, a) = exchange("What is the capital of France and why?");
        conversation.append_exchange(u, a);
        assert_eq!(conversation.title, "What is the capital of France ...");
        assert_eq!(conversation.turn_count(), 2);

        let (u, a) = exchange("Something else entirely");
        conversation.append_exchange(u, a);
        assert_eq!(conversation.title, "What is the capital of France ...");
    }

    #[test]
    fn test_seed_title_replaced_when_empty() {
        let mut conversation = Conversation::with_title(vec!["acc_1".into()], "Seed");
        let (u, a) = exchange("hello");
        conversation.append_exchange(u, a);
        assert_eq!(conversation.title, "hello");
    }

    #[test]
    fn test_body_equal_to_placeholder_does_not_retrigger() {
        let mut conversation = Conversation::new(vec!["acc_1".into()]);
        let (u, a) = exchange(DEFAULT_TITLE);
        conversation.append_exchange(u, a);
        let (u, a) = exchange("second message");
        conversation.append_exchange(u, a);
        assert_eq!(conversation.title, DEFAULT_TITLE);
    }
}
