use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorPaymentStatus {
    Created,
    Authorized,
    Captured,
    Refunded,
    Failed,
}

impl ProcessorPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorPayment {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: ProcessorPaymentStatus,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorRefund {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub payment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}
