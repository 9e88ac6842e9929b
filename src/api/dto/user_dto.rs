//! 账户 DTO
//!
//! 注册、登录、资料与等级调整的请求和响应。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::account::Account;
use crate::models::tier::Tier;

/// 注册请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 登录请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 注册/登录响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    /// 订阅等级
    pub role: Tier,
    pub token: String,
}

impl AuthResponse {
    pub fn new(account: Account, token: String) -> Self {
        Self {
            id: account.id,
            name: account.name,
            username: account.username,
            email: account.email,
            role: account.tier,
            token,
        }
    }
}

/// 账户资料（不含密码哈希）
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Tier,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            username: account.username,
            email: account.email,
            role: account.tier,
            created_at: account.created_at,
            last_login: account.last_login,
        }
    }
}
