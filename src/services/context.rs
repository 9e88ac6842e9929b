//! 上下文组装
//!
//! 把会话历史裁剪为固定窗口，并映射为上游消息列表。

use crate::clients::completion::ChatMessage;
use crate::models::turn::Turn;

/// 每次请求携带的历史轮次数上限（不可由用户调整）
pub const CONTEXT_WINDOW: usize = 5;

/// 上下文组装器，无状态
#[derive(Debug, Clone, Copy)]
pub struct ContextAssembler {
    window: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            window: CONTEXT_WINDOW,
        }
    }
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// 组装上游消息
    ///
    /// 历史按 created_at 升序稳定排序后取最近 `window` 条，新消息永远在最后。
    /// 输出长度为 `min(history.len(), window) + 1`。
    pub fn build(&self, history: &[Turn], new_content: &str) -> Vec<ChatMessage> {
        let mut ordered: Vec<&Turn> = history.iter().collect();
        ordered.sort_by_key(|turn| turn.created_at);

        let skip = ordered.len().saturating_sub(self.window);
        let mut messages: Vec<ChatMessage> = ordered
            .into_iter()
            .skip(skip)
            .map(|turn| {
                if turn.author.is_assistant() {
                    ChatMessage::assistant(&turn.body)
                } else {
                    ChatMessage::user(&turn.body)
                }
            })
            .collect();

        messages.push(ChatMessage::user(new_content));
        messages
    }
}
