//! 账户服务
//!
//! 注册、登录、资料查询和等级调整。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::account::Account;
use crate::security::auth::JwtTokenGenerator;
use crate::security::password::{PasswordHasher, validate_password};
use crate::security::validation::{RequestValidator, validators};
use crate::storage::repository::AccountRepository;

/// 注册请求
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 登录成功后的账户与令牌
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub token: String,
}

/// 账户服务 trait
#[async_trait]
pub trait AccountService: Send + Sync {
    /// 注册新账户，初始等级为 starter
    async fn register(&self, registration: Registration) -> Result<Session>;

    /// 邮箱密码登录
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    /// 查询账户
    async fn profile(&self, account_id: &str) -> Result<Account>;
}

/// 账户服务实现
pub struct AccountServiceImpl {
    accounts: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    tokens: JwtTokenGenerator,
    validator: RequestValidator,
}

impl AccountServiceImpl {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: PasswordHasher,
        tokens: JwtTokenGenerator,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            validator: RequestValidator::new(),
        }
    }

    fn invalid_credentials() -> AppError {
        AppError::Validation("Invalid credentials".to_string())
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, registration: Registration) -> Result<Session> {
        let name = RequestValidator::sanitize_string(&registration.name);
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_lowercase();

        validators::validate_name(&name)?;
        validators::validate_username(&username)?;
        self.validator.validate_email("email", &email)?;

        if self.accounts.find_by_email(&email).await?.is_some()
            || self.accounts.find_by_username(&username).await?.is_some()
        {
            return Err(AppError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let problems = validate_password(&registration.password);
        if !problems.is_empty() {
            return Err(AppError::Validation(format!(
                "Password does not meet requirements: {}",
                problems.join("; ")
            )));
        }

        let password_hash = self.hasher.hash(&registration.password).await?;
        let account = Account::new(&name, &username, &email, &password_hash);
        let account = self.accounts.create(&account).await?;
        let token = self.tokens.generate_token(&account.id)?;

        info!(account_id = %account.id, username = %account.username, "account registered");
        Ok(Session { account, token })
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let Some(mut account) = self.accounts.find_by_email(&email).await? else {
            return Err(Self::invalid_credentials());
        };

        if !self.hasher.verify(password, &account.password_hash).await? {
            warn!(account_id = %account.id, "login with wrong password");
            return Err(Self::invalid_credentials());
        }

        account.touch_login();
        let account = self.accounts.update(&account).await?;
        let token = self.tokens.generate_token(&account.id)?;

        Ok(Session { account, token })
    }

    async fn profile(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .get_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

/// 创建账户服务
pub fn create_account_service(
    accounts: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    tokens: JwtTokenGenerator,
) -> Box<dyn AccountService> {
    Box::new(AccountServiceImpl::new(accounts, hasher, tokens))
}
