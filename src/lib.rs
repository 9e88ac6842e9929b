//! Ziora - 按订阅等级门控的对话补全后端
//!
//! 账户按等级（starter / professional / enterprise）解锁模型目录中的模型，
//! 对话请求携带最近的轮次作为上下文转发给上游补全服务。

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
