pub mod event;
pub mod status;

pub use event::{Amount, GatewayPayment, GatewayWebhookEvent};
pub use status::GatewayStatus;

/// Header the gateway uses to carry the shared webhook token.
pub const ACCESS_TOKEN_HEADER: &str = "asaas-access-token";
