//! 外部服务客户端
//!
//! 上游模型补全与支付网关。

pub mod completion;
pub mod payment_gateway;

pub use completion::{ChatMessage, CompletionClient, OpenRouterClient, Role};
pub use payment_gateway::{GatewayOrder, PaymentGateway, RazorpayGateway};
