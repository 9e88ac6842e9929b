use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tier::Tier;

/// 账号实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// 账号唯一标识
    pub id: String,

    /// 姓名
    pub name: String,

    /// 用户名（唯一）
    pub username: String,

    /// 邮箱（唯一）
    pub email: String,

    /// bcrypt 密码哈希
    pub password_hash: String,

    /// 订阅等级
    pub tier: Tier,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后登录时间
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// 创建新账号，默认等级为 starter
    pub fn new(name: &str, username: &str, email: &str, password_hash: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            tier: Tier::Starter,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    /// 记录登录
    pub fn touch_login(&mut self) {
        self.last_login = Some(Utc::now());
    }

    /// 提升等级，不会降级
    ///
    /// 返回等级是否发生变化。
    pub fn raise_tier(&mut self, tier: Tier) -> bool {
        if tier > self.tier {
            self.tier = tier;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_starter() {
        let account = Account::new("Ada", "ada", "ada@example.com", "hash");
        assert_eq!(account.tier, Tier::Starter);
        assert!(account.last_login.is_none());
    }

    #[test]
    fn test_raise_tier_never_decreases() {
        let mut account = Account::new("Ada", "ada", "ada@example.com", "hash");
        assert!(account.raise_tier(Tier::Enterprise));
        assert!(!account.raise_tier(Tier::Professional));
        assert_eq!(account.tier, Tier::Enterprise);
    }
}
