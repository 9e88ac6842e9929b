//! 服务模块

pub mod account;
pub mod chat;
pub mod context;
pub mod payment;

pub use account::{AccountService, Registration, Session, create_account_service};
pub use chat::{ChatService, SendMessage, SendMessageOutcome, create_chat_service};
pub use context::{CONTEXT_WINDOW, ContextAssembler};
pub use payment::{
    CreatedOrder, PaymentConfirmation, PaymentService, VerifiedPayment, create_payment_service,
};
