//! 核心数据模型模块
//!
//! 定义 Ziora 的核心数据结构：Tier, ModelCatalog, Turn, Conversation, Account, PaymentRecord。

pub mod account;
pub mod catalog;
pub mod conversation;
pub mod payment;
pub mod tier;
pub mod turn;

pub use account::Account;
pub use catalog::{ModelCatalog, ModelCatalogEntry};
pub use conversation::Conversation;
pub use payment::{OrderStatus, PaymentOrder, PaymentRecord, PaymentStatus, Plan};
pub use tier::Tier;
pub use turn::{Author, Turn};
