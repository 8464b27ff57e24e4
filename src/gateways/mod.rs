use crate::domain::processor::{CreateOrderRequest, ProcessorOrder, ProcessorPayment, ProcessorRefund};
use thiserror::Error;

pub mod mock;
pub mod razorpay;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("{description}")]
    Rejected {
        status: u16,
        code: Option<String>,
        description: String,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("processor request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected processor response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn code(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { code, .. } => code.as_deref(),
            GatewayError::NotFound(_) => Some("NOT_FOUND"),
            GatewayError::Timeout => Some("TIMEOUT"),
            GatewayError::Network(_) => Some("NETWORK_ERROR"),
            GatewayError::Decode(_) => None,
        }
    }
}

/// The four processor primitives the session flows depend on. Each call is a single
/// remote attempt; nothing here retries.
#[async_trait::async_trait]
pub trait ProcessorGateway: Send + Sync {
    fn name(&self) -> &'static str;

    fn has_credentials(&self) -> bool;

    async fn create_order(&self, request: CreateOrderRequest) -> Result<ProcessorOrder, GatewayError>;

    async fn fetch_payment(&self, payment_id: &str) -> Result<ProcessorPayment, GatewayError>;

    async fn capture_payment(
        &self,
        payment_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ProcessorPayment, GatewayError>;

    /// `None` refunds the full captured amount.
    async fn refund_payment(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<ProcessorRefund, GatewayError>;
}
